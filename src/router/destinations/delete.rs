use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::destination::DestinationRepository;
use crate::error::{Result, ServerError};

#[derive(Debug, Serialize)]
pub struct Response {
    message: String,
}

/// Handler to delete a destination and its stored images.
pub async fn handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Response>> {
    let deleted = DestinationRepository::new(state.db.postgres.clone())
        .delete(id)
        .await?;

    if !deleted {
        return Err(ServerError::NotFound("Destination"));
    }

    // The record is gone at this point. A failed removal leaves orphaned
    // files behind; surface it in the logs rather than failing the request.
    if let Err(err) = state.storage.remove_all(id).await {
        tracing::error!(destination_id = %id, error = %err,
            "destination images not removed, media directory is orphaned");
    }

    tracing::info!(destination_id = %id, "destination deleted");

    Ok(Json(Response {
        message: "Destination deleted successfully".into(),
    }))
}
