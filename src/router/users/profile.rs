//! Get, update and delete the authenticated user's profile.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::{AuthUser, Valid};
use crate::user::{User, UserRepository};

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    id: Uuid,
    username: String,
    email: String,
    phone: String,
    avatar: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
        }
    }
}

pub async fn get_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let user = UserRepository::new(state.db.postgres.clone())
        .find_by_id(auth.id)
        .await?
        .ok_or(ServerError::NotFound("User"))?;

    Ok(Json(user.into()))
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be 2 to 50 characters long."
    ))]
    username: Option<String>,
    #[validate(custom(
        function = super::validate_phone,
        message = "Phone must be exactly 8 digits."
    ))]
    phone: Option<String>,
    avatar: Option<String>,
}

pub async fn update_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Valid(body): Valid<Body>,
) -> Result<Json<ProfileResponse>> {
    let user = UserRepository::new(state.db.postgres.clone())
        .update_profile(
            auth.id,
            body.username.as_deref(),
            body.phone.as_deref(),
            body.avatar.as_deref(),
        )
        .await?
        .ok_or(ServerError::NotFound("User"))?;

    Ok(Json(user.into()))
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    message: String,
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DeletedResponse>> {
    let deleted = UserRepository::new(state.db.postgres.clone())
        .delete(auth.id)
        .await?;

    if !deleted {
        return Err(ServerError::NotFound("User"));
    }

    tracing::info!(user_id = %auth.id, "user account deleted");

    Ok(Json(DeletedResponse {
        message: "User account deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_body_validates() {
        let body = Body {
            username: None,
            phone: Some("12345678".into()),
            avatar: None,
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_bad_phone_is_rejected_even_when_optional() {
        let body = Body {
            username: None,
            phone: Some("12-45678".into()),
            avatar: None,
        };
        assert!(body.validate().is_err());
    }
}
