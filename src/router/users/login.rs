use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::router::users::AccountResponse;
use crate::user::UserRepository;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Handler to log a user in.
///
/// An unknown email and a wrong password answer identically.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<AccountResponse>> {
    let repo = UserRepository::new(state.db.postgres.clone());

    let user = repo
        .find_by_email(&body.email)
        .await?
        .ok_or(ServerError::InvalidCredentials)?;

    state.crypto.verify_password(&body.password, &user.password)?;

    let token = state.token.create(&user.id.to_string(), &user.email)?;

    Ok(Json(AccountResponse::new(user, token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_is_a_validation_error() {
        let body = Body {
            email: "a@x.com".into(),
            password: String::new(),
        };
        assert!(body.validate().is_err());
    }
}
