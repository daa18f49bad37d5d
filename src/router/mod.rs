//! HTTP API surface.

pub mod bookings;
pub mod destinations;
pub mod users;

use axum::extract::{FromRequest, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, ServerError};

const BEARER: &str = "Bearer ";

/// Identity decoded from a bearer token, attached to protected requests.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// JSON extractor that also runs validation rules on the body.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Custom middleware for authentification.
///
/// Missing credentials and undecodable tokens fail closed with distinct
/// statuses; the decoded identity is stored for downstream handlers.
pub async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix(BEARER))
        .ok_or(ServerError::AccessRequired)?;

    let claims = state
        .token
        .decode(token)
        .map_err(|_| ServerError::InvalidToken)?;
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ServerError::InvalidToken)?;

    req.extensions_mut().insert(AuthUser {
        id,
        email: claims.email,
    });
    Ok(next.run(req).await)
}

/// Assemble the `/api` router.
pub fn api(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/destinations", destinations::router())
        .nest("/users", users::router(state.clone()))
        .nest("/booking", bookings::router(state))
}
