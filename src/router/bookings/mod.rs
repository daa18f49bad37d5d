//! Bookings-related HTTP API. Every route requires bearer authentication.

mod create;
mod list;
mod remove;

use axum::routing::{delete, get};
use axum::{Router, middleware};

use crate::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /booking` goes to `list`, `POST` to `create`.
        .route("/", get(list::handler).post(create::handler))
        // `DELETE /booking/{id}` goes to `remove`.
        .route("/{id}", delete(remove::handler))
        .route_layer(middleware::from_fn_with_state(state, super::auth))
}
