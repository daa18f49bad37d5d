//! Handle database requests for users.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;
use crate::user::User;

const COLUMNS: &str =
    "id, username, email, password, phone, avatar, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    ///
    /// The unique index on `email` backs the duplicate check done by the
    /// signup handler.
    pub async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO users (id, username, email, password, phone, avatar)
                VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.phone)
        .bind(&user.avatar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find a user using the `id` field.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Find a user using the `email` field.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Update profile fields of a user, returning the new record.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        username: Option<&str>,
        phone: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<User>> {
        let query = format!(
            r#"UPDATE users SET
                username = COALESCE($2, username),
                phone = COALESCE($3, phone),
                avatar = COALESCE($4, avatar)
                WHERE id = $1
                RETURNING {COLUMNS}"#
        );

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(username)
            .bind(phone)
            .bind(avatar)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Delete a user account.
    pub async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
