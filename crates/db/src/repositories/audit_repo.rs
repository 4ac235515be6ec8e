//! Repository for the append-only audit trail.

use inventra_core::audit;
use sqlx::PgPool;

use crate::models::audit::{AuditLog, AuditQuery, NewAuditLog};
use crate::repositories::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, actor_id, action_type, entity_type, entity_id, details, \
                       category, created_at";

/// Default page size for audit queries.
const DEFAULT_LIMIT: i64 = 100;

/// Maximum page size for audit queries.
const MAX_LIMIT: i64 = 500;

/// Provides write and query access to audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append an audit entry. The category is derived from the action type
    /// and sensitive detail fields are redacted before storage.
    ///
    /// Audit writes never fail the business operation they describe: the
    /// caller logs and continues on error.
    pub async fn insert(pool: &PgPool, entry: &NewAuditLog) -> Result<AuditLog, sqlx::Error> {
        let category = audit::action_to_category(entry.action_type);
        let details = audit::redact_sensitive_fields(&entry.details);

        let query = format!(
            "INSERT INTO audit_logs (actor_id, action_type, entity_type, entity_id, details, category) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.actor_id)
            .bind(entry.action_type)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(&details)
            .bind(category)
            .fetch_one(pool)
            .await
    }

    /// Query the trail with filters, newest first.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let (where_clause, bind_idx) = Self::build_conditions(params);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let q = Self::bind_conditions(sqlx::query_as::<_, AuditLog>(&query), params)
            .bind(limit)
            .bind(offset);
        q.fetch_all(pool).await
    }

    /// Query the trail with filters, unpaged, newest first. Used by the
    /// CSV export.
    pub async fn export(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let (where_clause, _) = Self::build_conditions(params);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause} ORDER BY created_at DESC"
        );
        Self::bind_conditions(sqlx::query_as::<_, AuditLog>(&query), params)
            .fetch_all(pool)
            .await
    }

    /// Total matching entries for the same filters (unpaged).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = Self::build_conditions(params);
        let query = format!("SELECT COUNT(*) FROM audit_logs {where_clause}");
        let count: (i64,) = Self::bind_conditions(sqlx::query_as(&query), params)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    fn build_conditions(params: &AuditQuery) -> (String, u32) {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.actor_id.is_some() {
            conditions.push(format!("actor_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.action_type.is_some() {
            conditions.push(format!("action_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.entity_type.is_some() {
            conditions.push(format!("entity_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.entity_id.is_some() {
            conditions.push(format!("entity_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.category.is_some() {
            conditions.push(format!("category = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.from.is_some() {
            conditions.push(format!("created_at >= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.to.is_some() {
            conditions.push(format!("created_at <= ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (where_clause, bind_idx)
    }

    fn bind_conditions<'q, O>(
        mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
        params: &'q AuditQuery,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        if let Some(actor_id) = params.actor_id {
            q = q.bind(actor_id);
        }
        if let Some(ref action_type) = params.action_type {
            q = q.bind(action_type);
        }
        if let Some(ref entity_type) = params.entity_type {
            q = q.bind(entity_type);
        }
        if let Some(entity_id) = params.entity_id {
            q = q.bind(entity_id);
        }
        if let Some(ref category) = params.category {
            q = q.bind(category);
        }
        if let Some(from) = params.from {
            q = q.bind(from);
        }
        if let Some(to) = params.to {
            q = q.bind(to);
        }
        q
    }
}
