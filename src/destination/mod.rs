mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Window during which a destination can be booked.
#[derive(
    Clone, Copy, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Availability {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Rental listing as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: Uuid,
    pub title: String,
    pub room_type: String,
    pub description: String,
    pub address: String,
    pub city: Option<String>,
    pub country: String,
    /// Nightly price.
    pub price: f64,
    /// Absolute URLs of stored images.
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub beds: i32,
    #[sqlx(flatten)]
    pub availability: Availability,
    /// Whether an active booking exists against this listing.
    pub occupied: bool,
    pub created_at: DateTime<Utc>,
}
