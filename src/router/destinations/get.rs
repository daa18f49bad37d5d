use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::AppState;
use crate::destination::{Destination, DestinationRepository};
use crate::error::{Result, ServerError};

/// Handler to fetch a single destination.
pub async fn handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Destination>> {
    let destination = DestinationRepository::new(state.db.postgres.clone())
        .find_by_id(id)
        .await?
        .ok_or(ServerError::NotFound("Destination"))?;

    Ok(Json(destination))
}
