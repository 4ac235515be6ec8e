//! Repository for the `locations` table.

use std::collections::HashMap;

use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

const COLUMNS: &str = "id, name, address_line1, address_line2, city, state, country, \
                       postal_code, is_active, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (name, address_line1, address_line2, city, state, country, postal_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.name)
            .bind(input.address_line1.as_deref())
            .bind(input.address_line2.as_deref())
            .bind(input.city.as_deref())
            .bind(input.state.as_deref())
            .bind(input.country.as_deref())
            .bind(input.postal_code.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List locations, optionally including deactivated ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Location>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM locations ORDER BY name")
        } else {
            format!("SELECT {COLUMNS} FROM locations WHERE is_active ORDER BY name")
        };
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET \
                name = COALESCE($2, name), \
                address_line1 = COALESCE($3, address_line1), \
                address_line2 = COALESCE($4, address_line2), \
                city = COALESCE($5, city), \
                state = COALESCE($6, state), \
                country = COALESCE($7, country), \
                postal_code = COALESCE($8, postal_code), \
                is_active = COALESCE($9, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.address_line1.as_deref())
            .bind(input.address_line2.as_deref())
            .bind(input.city.as_deref())
            .bind(input.state.as_deref())
            .bind(input.country.as_deref())
            .bind(input.postal_code.as_deref())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Map active location names to ids, for bulk import resolution.
    pub async fn names_to_ids(pool: &PgPool) -> Result<HashMap<String, DbId>, sqlx::Error> {
        let rows: Vec<(String, DbId)> =
            sqlx::query_as("SELECT name, id FROM locations WHERE is_active")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }
}
