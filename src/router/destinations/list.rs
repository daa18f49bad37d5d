use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use crate::AppState;
use crate::destination::{Destination, DestinationRepository};
use crate::error::Result;
use crate::pagination::{PageQuery, Paging};

#[derive(Debug, Serialize)]
pub struct Response {
    pub destinations: Vec<Destination>,
    pub paging: Paging,
}

/// Handler to list unoccupied destinations, paginated.
pub async fn handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Response>> {
    let page = query.page();

    let (destinations, total_count) =
        DestinationRepository::new(state.db.postgres.clone())
            .list_unoccupied(page)
            .await?;

    Ok(Json(Response {
        destinations,
        paging: Paging::new(page, total_count),
    }))
}
