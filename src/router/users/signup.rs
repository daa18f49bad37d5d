use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::router::users::AccountResponse;
use crate::user::{User, UserRepository};

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be 2 to 50 characters long."
    ))]
    pub username: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
    pub confirm_password: String,
    #[validate(custom(
        function = super::validate_phone,
        message = "Phone must be exactly 8 digits."
    ))]
    pub phone: String,
    pub avatar: Option<String>,
}

fn passwords_mismatch() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "confirmPassword",
        ValidationError::new("confirm_password")
            .with_message("Passwords do not match.".into()),
    );
    errors
}

fn duplicate_email() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "email",
        ValidationError::new("email")
            .with_message("User already exists with this email.".into()),
    );
    errors
}

/// Handler to register a user.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    if body.password != body.confirm_password {
        return Err(passwords_mismatch().into());
    }

    let repo = UserRepository::new(state.db.postgres.clone());
    if repo.find_by_email(&body.email).await?.is_some() {
        return Err(duplicate_email().into());
    }

    let user = User {
        id: Uuid::new_v4(),
        username: body.username,
        email: body.email,
        password: state.crypto.hash_password(&body.password)?,
        phone: body.phone,
        avatar: body.avatar,
        created_at: Utc::now(),
    };
    repo.insert(&user).await?;

    let token = state.token.create(&user.id.to_string(), &user.email)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(AccountResponse::new(user, token))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Body {
        Body {
            username: "Ada".into(),
            email: "a@x.com".into(),
            password: "Passw0rd".into(),
            confirm_password: "Passw0rd".into(),
            phone: "12345678".into(),
            avatar: None,
        }
    }

    #[test]
    fn test_valid_body() {
        assert!(body().validate().is_ok());
    }

    #[test]
    fn test_malformed_email() {
        for email in ["", "missing-domain", "@x.com", "a@"] {
            let mut body = body();
            body.email = email.into();
            let errors = body.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("email"), "{email:?}");
        }
    }

    #[test]
    fn test_phone_must_be_eight_digits() {
        for phone in ["1234567", "123456789", "1234567a", "", "12 45678"] {
            let mut body = body();
            body.phone = phone.into();
            let errors = body.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("phone"), "{phone:?}");
        }
    }

    #[test]
    fn test_short_password() {
        let mut body = body();
        body.password = "short".into();
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_password_confirmation() {
        let errors = passwords_mismatch();
        assert!(errors.field_errors().contains_key("confirmPassword"));
    }
}
