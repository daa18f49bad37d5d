//! Handle database requests for bookings and keep booking state consistent
//! with destination occupancy.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::booking::{Booking, BookingView};
use crate::destination::{Availability, Destination};
use crate::error::{Result, ServerError};

const BOOKING_COLUMNS: &str = "id, destination_id, user_id, email, guests,
    stay_ended, created_at, updated_at";

/// One row of the booking/destination join.
#[derive(sqlx::FromRow)]
struct BookingDestinationRow {
    id: Uuid,
    destination_id: Uuid,
    email: String,
    guests: i32,
    stay_ended: bool,
    created_at: DateTime<Utc>,
    title: String,
    room_type: String,
    description: String,
    address: String,
    city: Option<String>,
    country: String,
    price: f64,
    images: Vec<String>,
    amenities: Vec<String>,
    max_guests: i32,
    bedrooms: i32,
    bathrooms: i32,
    beds: i32,
    available_from: DateTime<Utc>,
    available_to: DateTime<Utc>,
    occupied: bool,
    listed_at: DateTime<Utc>,
}

impl From<BookingDestinationRow> for BookingView {
    fn from(row: BookingDestinationRow) -> Self {
        Self {
            id: row.id,
            destination: Destination {
                id: row.destination_id,
                title: row.title,
                room_type: row.room_type,
                description: row.description,
                address: row.address,
                city: row.city,
                country: row.country,
                price: row.price,
                images: row.images,
                amenities: row.amenities,
                max_guests: row.max_guests,
                bedrooms: row.bedrooms,
                bathrooms: row.bathrooms,
                beds: row.beds,
                availability: Availability {
                    from: row.available_from,
                    to: row.available_to,
                },
                occupied: row.occupied,
                created_at: row.listed_at,
            },
            email: row.email,
            guests: row.guests,
            stay_ended: row.stay_ended,
            created_at: row.created_at,
        }
    }
}

fn not_bookable(message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "destinationId",
        ValidationError::new("destination").with_message(message.into()),
    );
    errors
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: Pool<Postgres>,
}

impl BookingRepository {
    /// Create a new [`BookingRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Reserve a destination for a user.
    ///
    /// The destination row is locked for the whole transaction, so the
    /// booking insert and the occupancy flip commit together or not at all.
    pub async fn create(
        &self,
        user_id: Uuid,
        destination_id: Uuid,
        email: &str,
        guests: i32,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;

        let destination = sqlx::query_as::<_, (DateTime<Utc>, bool)>(
            r#"SELECT available_to, occupied FROM destinations
                WHERE id = $1 FOR UPDATE"#,
        )
        .bind(destination_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((available_to, occupied)) = destination else {
            return Err(ServerError::NotFound("Destination"));
        };
        if available_to < now {
            return Err(not_bookable(
                "Destination availability window has passed.",
            )
            .into());
        }
        if occupied {
            return Err(not_bookable("Destination is already occupied.").into());
        }

        let query = format!(
            r#"INSERT INTO bookings (id, destination_id, user_id, email, guests)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {BOOKING_COLUMNS}"#
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(Uuid::new_v4())
            .bind(destination_id)
            .bind(user_id)
            .bind(email)
            .bind(guests)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE destinations SET occupied = TRUE WHERE id = $1")
            .bind(destination_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(booking)
    }

    /// Delete a booking owned by `user_id`.
    ///
    /// A foreign or unknown booking id fails identically, so callers cannot
    /// probe for other users' bookings. Occupancy is cleared without
    /// checking for other bookings against the same destination; the create
    /// path guarantees at most one active booking per destination.
    pub async fn delete_owned(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let destination_id = sqlx::query_scalar::<_, Uuid>(
            r#"DELETE FROM bookings WHERE id = $1 AND user_id = $2
                RETURNING destination_id"#,
        )
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(destination_id) = destination_id else {
            return Err(ServerError::NotFound("Booking"));
        };

        sqlx::query("UPDATE destinations SET occupied = FALSE WHERE id = $1")
            .bind(destination_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Mark the user's bookings whose destination availability window has
    /// passed as ended.
    ///
    /// One atomic statement; the `stay_ended = FALSE` guard makes the
    /// transition monotone, so concurrent readers race benignly.
    pub async fn end_elapsed_stays(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE bookings SET stay_ended = TRUE, updated_at = $2
                FROM destinations d
                WHERE bookings.destination_id = d.id
                AND bookings.user_id = $1
                AND bookings.stay_ended = FALSE
                AND d.available_to < $2"#,
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Total bookings of a user, regardless of state.
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        Ok(sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    /// One page of the user's bookings joined with destination details,
    /// in insertion order.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BookingView>> {
        let rows = sqlx::query_as::<_, BookingDestinationRow>(
            r#"SELECT
                b.id,
                b.destination_id,
                b.email,
                b.guests,
                b.stay_ended,
                b.created_at,
                d.title,
                d.room_type,
                d.description,
                d.address,
                d.city,
                d.country,
                d.price,
                d.images,
                d.amenities,
                d.max_guests,
                d.bedrooms,
                d.bathrooms,
                d.beds,
                d.available_from,
                d.available_to,
                d.occupied,
                d.created_at AS listed_at
                FROM bookings AS b
                INNER JOIN destinations AS d ON b.destination_id = d.id
                WHERE b.user_id = $1
                ORDER BY b.created_at ASC
                OFFSET $2 LIMIT $3"#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookingView::from).collect())
    }
}
