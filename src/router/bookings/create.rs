use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::booking::{Booking, BookingRepository};
use crate::error::Result;
use crate::router::{AuthUser, Valid};
use axum::Extension;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub destination_id: Uuid,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(range(min = 1, message = "Guests must be a positive count."))]
    pub guests: i32,
}

/// Handler to reserve a destination for the caller.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Booking>)> {
    let booking = BookingRepository::new(state.db.postgres.clone())
        .create(
            auth.id,
            body.destination_id,
            &body.email,
            body.guests,
            Utc::now(),
        )
        .await?;

    tracing::info!(booking_id = %booking.id, destination_id = %booking.destination_id,
        "booking created");

    Ok((StatusCode::CREATED, Json(booking)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guests_must_be_positive() {
        for guests in [0, -2] {
            let body = Body {
                destination_id: Uuid::new_v4(),
                email: "a@x.com".into(),
                guests,
            };
            let errors = body.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("guests"), "{guests}");
        }
    }

    #[test]
    fn test_missing_fields_fail_deserialization() {
        // destinationId, email and guests are all mandatory.
        for body in [
            r#"{}"#,
            r#"{"email": "a@x.com", "guests": 2}"#,
            r#"{"destinationId": "5f0c4e48-5e5c-4b9d-b6cf-5a53e42a4f41"}"#,
        ] {
            assert!(serde_json::from_str::<Body>(body).is_err(), "{body}");
        }
    }
}
