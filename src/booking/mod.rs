mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::destination::Destination;

/// Booking as saved on database.
///
/// `destination_id` and `user_id` are plain references, not foreign keys.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub destination_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub guests: i32,
    /// False while the stay is active; flips to true once the
    /// destination's availability window has passed. Never flips back.
    pub stay_ended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking joined with its destination details, as returned by the list
/// endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub destination: Destination,
    pub email: String,
    pub guests: i32,
    pub stay_ended: bool,
    pub created_at: DateTime<Utc>,
}
