//! Destinations-related HTTP API.

mod create;
mod delete;
mod get;
mod list;
mod update;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::AppState;
use crate::storage::MAX_IMAGE_BYTES;

/// Room left on top of the per-image ceiling for form fields and
/// multiple image parts.
const BODY_LIMIT: usize = 8 * MAX_IMAGE_BYTES;

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /destinations` goes to `list`, `POST` to `create`.
        .route("/", get(list::handler).post(create::handler))
        // `GET|PUT|PATCH|DELETE /destinations/{id}`.
        .route(
            "/{id}",
            get(get::handler)
                .put(update::handler)
                .patch(update::handler)
                .delete(delete::handler),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}
