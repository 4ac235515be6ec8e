//! Repository for the `separation_reasons` lookup table.

use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::separation_reason::{
    CreateSeparationReason, SeparationReason, UpdateSeparationReason,
};

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Provides CRUD operations for separation reasons.
pub struct SeparationReasonRepo;

impl SeparationReasonRepo {
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<SeparationReason>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM separation_reasons ORDER BY id")
        } else {
            format!("SELECT {COLUMNS} FROM separation_reasons WHERE is_active ORDER BY id")
        };
        sqlx::query_as::<_, SeparationReason>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SeparationReason>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM separation_reasons WHERE id = $1");
        sqlx::query_as::<_, SeparationReason>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateSeparationReason,
    ) -> Result<SeparationReason, sqlx::Error> {
        let query = format!(
            "INSERT INTO separation_reasons (name, description) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeparationReason>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSeparationReason,
    ) -> Result<Option<SeparationReason>, sqlx::Error> {
        let query = format!(
            "UPDATE separation_reasons SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                is_active = COALESCE($4, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeparationReason>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
