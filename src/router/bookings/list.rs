use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;
use crate::booking::{BookingRepository, BookingView};
use crate::error::Result;
use crate::pagination::{PageQuery, Paging};
use crate::router::AuthUser;
use axum::Extension;

#[derive(Debug, Serialize)]
pub struct Response {
    pub bookings: Vec<BookingView>,
    pub paging: Paging,
}

/// Handler to list the caller's bookings, paginated.
///
/// Reading is what retires elapsed stays: before the page is built, every
/// booking of the caller whose destination availability window has passed
/// is marked ended.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Response>> {
    let repo = BookingRepository::new(state.db.postgres.clone());

    let ended = repo.end_elapsed_stays(auth.id, Utc::now()).await?;
    if ended > 0 {
        tracing::debug!(user_id = %auth.id, ended, "stays marked as ended");
    }

    let page = query.page();
    let total_count = repo.count_for_user(auth.id).await?;
    let bookings = repo
        .list_for_user(auth.id, page.offset(), page.limit())
        .await?;

    Ok(Json(Response {
        bookings,
        paging: Paging::new(page, total_count),
    }))
}
