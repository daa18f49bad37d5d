//! Handle database requests for destinations.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::destination::Destination;
use crate::error::Result;
use crate::pagination::Page;

const COLUMNS: &str = r#"id, title, room_type, description, address, city,
    country, price, images, amenities, max_guests, bedrooms, bathrooms, beds,
    available_from AS "from", available_to AS "to", occupied, created_at"#;

/// Partial update of a [`Destination`]; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct DestinationChanges {
    pub title: Option<String>,
    pub room_type: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub price: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub beds: Option<i32>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct DestinationRepository {
    pool: Pool<Postgres>,
}

impl DestinationRepository {
    /// Create a new [`DestinationRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One page of unoccupied destinations in insertion order, with the
    /// filtered total count.
    pub async fn list_unoccupied(
        &self,
        page: Page,
    ) -> Result<(Vec<Destination>, i64)> {
        let total_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM destinations WHERE occupied = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"SELECT {COLUMNS} FROM destinations
                WHERE occupied = FALSE
                ORDER BY created_at ASC
                OFFSET $1 LIMIT $2"#
        );
        let destinations = sqlx::query_as::<_, Destination>(&query)
            .bind(page.offset())
            .bind(page.limit())
            .fetch_all(&self.pool)
            .await?;

        Ok((destinations, total_count))
    }

    /// Find a destination using the `id` field.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Destination>> {
        let query =
            format!("SELECT {COLUMNS} FROM destinations WHERE id = $1");

        Ok(sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Insert [`Destination`] into database.
    pub async fn insert(&self, destination: &Destination) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO destinations
                (id, title, room_type, description, address, city, country,
                price, images, amenities, max_guests, bedrooms, bathrooms,
                beds, available_from, available_to, occupied)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17)"#,
        )
        .bind(destination.id)
        .bind(&destination.title)
        .bind(&destination.room_type)
        .bind(&destination.description)
        .bind(&destination.address)
        .bind(&destination.city)
        .bind(&destination.country)
        .bind(destination.price)
        .bind(&destination.images)
        .bind(&destination.amenities)
        .bind(destination.max_guests)
        .bind(destination.bedrooms)
        .bind(destination.bathrooms)
        .bind(destination.beds)
        .bind(destination.availability.from)
        .bind(destination.availability.to)
        .bind(destination.occupied)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Apply a partial update, returning the new record.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &DestinationChanges,
    ) -> Result<Option<Destination>> {
        let query = format!(
            r#"UPDATE destinations SET
                title = COALESCE($2, title),
                room_type = COALESCE($3, room_type),
                description = COALESCE($4, description),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                price = COALESCE($8, price),
                amenities = COALESCE($9, amenities),
                max_guests = COALESCE($10, max_guests),
                bedrooms = COALESCE($11, bedrooms),
                bathrooms = COALESCE($12, bathrooms),
                beds = COALESCE($13, beds),
                available_from = COALESCE($14, available_from),
                available_to = COALESCE($15, available_to)
                WHERE id = $1
                RETURNING {COLUMNS}"#
        );

        Ok(sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.room_type)
            .bind(&changes.description)
            .bind(&changes.address)
            .bind(&changes.city)
            .bind(&changes.country)
            .bind(changes.price)
            .bind(&changes.amenities)
            .bind(changes.max_guests)
            .bind(changes.bedrooms)
            .bind(changes.bathrooms)
            .bind(changes.beds)
            .bind(changes.available_from)
            .bind(changes.available_to)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Delete a destination record.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
