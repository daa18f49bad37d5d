use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::booking::BookingRepository;
use crate::error::Result;
use crate::router::AuthUser;
use axum::Extension;

#[derive(Debug, Serialize)]
pub struct Response {
    message: String,
}

/// Handler to delete one of the caller's bookings.
///
/// Bookings owned by someone else answer exactly like unknown ids.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Response>> {
    BookingRepository::new(state.db.postgres.clone())
        .delete_owned(id, auth.id)
        .await?;

    tracing::info!(booking_id = %id, "booking deleted");

    Ok(Json(Response {
        message: "Booking deleted successfully".into(),
    }))
}
