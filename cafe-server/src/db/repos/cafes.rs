//! Cafe repository
//!
//! Thin facade over the `cafe` table:
//! - create: INSERT ... RETURNING, unique name enforced by the table
//! - update/delete: single statement, absence reported as NotFound

use sqlx::SqlitePool;

use crate::models::{Cafe, NewCafe};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{key}' already exists")]
    Conflict { resource: &'static str, key: String },
}

/// Cafe repository
pub struct CafeRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CafeRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All cafes in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Cafe>, DbError> {
        let cafes = sqlx::query_as::<_, Cafe>(
            r#"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(cafes)
    }

    /// Get a single cafe by id.
    pub async fn get(&self, id: i64) -> Result<Cafe, DbError> {
        sqlx::query_as::<_, Cafe>(
            r#"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// First cafe (lowest id) whose location matches exactly.
    pub async fn find_by_location(&self, location: &str) -> Result<Option<Cafe>, DbError> {
        let cafe = sqlx::query_as::<_, Cafe>(
            r#"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            WHERE location = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(location)
        .fetch_optional(self.pool)
        .await?;

        Ok(cafe)
    }

    /// One cafe picked uniformly at random, `None` when the table is empty.
    pub async fn random(&self) -> Result<Option<Cafe>, DbError> {
        let cafe = sqlx::query_as::<_, Cafe>(
            r#"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            ORDER BY RANDOM()
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(cafe)
    }

    /// Insert a new cafe and return the stored row.
    ///
    /// A duplicate name surfaces as `DbError::Conflict`.
    pub async fn create(&self, cafe: &NewCafe) -> Result<Cafe, DbError> {
        let created = sqlx::query_as::<_, Cafe>(
            r#"
            INSERT INTO cafe (
                name, map_url, img_url, location, seats,
                has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, map_url, img_url, location, seats,
                      has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            "#,
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(&cafe.coffee_price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::Conflict {
                resource: "cafe",
                key: cafe.name.clone(),
            },
            other => DbError::Sqlx(other),
        })?;

        Ok(created)
    }

    /// Set the coffee price (or clear it with `None`) and return the updated row.
    pub async fn update_price(&self, id: i64, price: Option<&str>) -> Result<Cafe, DbError> {
        sqlx::query_as::<_, Cafe>(
            r#"
            UPDATE cafe
            SET coffee_price = ?
            WHERE id = ?
            RETURNING id, name, map_url, img_url, location, seats,
                      has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            "#,
        )
        .bind(price)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Delete a cafe by id.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM cafe WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Number of stored cafes.
    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cafe")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

fn not_found(id: i64) -> DbError {
    DbError::NotFound {
        resource: "Cafe",
        id: id.to_string(),
    }
}
