//! Users-related HTTP API.

mod login;
mod profile;
mod signup;

use std::sync::LazyLock;

use axum::routing::{get, post};
use axum::{Router, middleware};
use regex_lite::Regex;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

use crate::AppState;
use crate::user::User;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("phone regex"));

/// Phone numbers are exactly 8 digits.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// Canonical account envelope returned by signup and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub token: String,
}

impl AccountResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
            token,
        }
    }
}

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        // `GET|PUT|DELETE /users/profile`. Authorization required.
        .route(
            "/profile",
            get(profile::get_handler)
                .put(profile::update_handler)
                .delete(profile::delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, super::auth));

    Router::new()
        // `POST /users/signup` goes to `signup`.
        .route("/signup", post(signup::handler))
        // `POST /users/login` goes to `login`.
        .route("/login", post(login::handler))
        .merge(protected)
}
