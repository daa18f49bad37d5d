use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::destination::{
    Availability, Destination, DestinationChanges, DestinationRepository,
};
use crate::error::{Result, ServerError};
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    title: Option<String>,
    room_type: Option<String>,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative."))]
    price: Option<f64>,
    amenities: Option<Vec<String>>,
    #[validate(range(min = 1, message = "maxGuests must be positive."))]
    max_guests: Option<i32>,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    beds: Option<i32>,
    availability: Option<Availability>,
}

impl From<Body> for DestinationChanges {
    fn from(body: Body) -> Self {
        Self {
            title: body.title,
            room_type: body.room_type,
            description: body.description,
            address: body.address,
            city: body.city,
            country: body.country,
            price: body.price,
            amenities: body.amenities,
            max_guests: body.max_guests,
            bedrooms: body.bedrooms,
            bathrooms: body.bathrooms,
            beds: body.beds,
            available_from: body.availability.map(|window| window.from),
            available_to: body.availability.map(|window| window.to),
        }
    }
}

/// Handler to partially update a destination. Served under both `PUT`
/// and `PATCH`.
pub async fn handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Valid(body): Valid<Body>,
) -> Result<Json<Destination>> {
    let destination = DestinationRepository::new(state.db.postgres.clone())
        .update(id, &body.into())
        .await?
        .ok_or(ServerError::NotFound("Destination"))?;

    Ok(Json(destination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_a_noop_update() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.validate().is_ok());

        let changes = DestinationChanges::from(body);
        assert!(changes.title.is_none());
        assert!(changes.available_to.is_none());
    }

    #[test]
    fn test_availability_window_maps_to_both_bounds() {
        let body: Body = serde_json::from_str(
            r#"{"availability":
                {"from": "2026-08-01T00:00:00Z", "to": "2026-08-15T00:00:00Z"}}"#,
        )
        .unwrap();

        let changes = DestinationChanges::from(body);
        assert!(changes.available_from.is_some());
        assert!(changes.available_to.is_some());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let body: Body = serde_json::from_str(r#"{"price": -10.0}"#).unwrap();
        assert!(body.validate().is_err());
    }
}
