//! Handlers for audit log queries and export.
//!
//! All endpoints require the audit capability.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use inventra_core::csv;
use inventra_core::types::DbId;
use inventra_db::models::audit::{AuditLogPage, AuditQuery};
use inventra_db::repositories::AuditLogRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuditor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for audit log queries.
#[derive(Debug, Deserialize)]
pub struct AuditLogQueryParams {
    pub actor_id: Option<DbId>,
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AuditLogQueryParams {
    fn into_query(self) -> AppResult<AuditQuery> {
        Ok(AuditQuery {
            actor_id: self.actor_id,
            action_type: self.action_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            category: self.category,
            from: parse_timestamp(self.from.as_deref())?,
            to: parse_timestamp(self.to.as_deref())?,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Parse an optional RFC 3339 timestamp.
fn parse_timestamp(
    s: Option<&str>,
) -> AppResult<Option<chrono::DateTime<chrono::Utc>>> {
    match s {
        None => Ok(None),
        Some(v) => v
            .parse::<chrono::DateTime<chrono::Utc>>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid timestamp '{v}'"))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/audit-logs
///
/// Query audit logs with filters and pagination.
pub async fn query_audit_logs(
    RequireAuditor(_admin): RequireAuditor,
    State(state): State<AppState>,
    Query(params): Query<AuditLogQueryParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query()?;
    let items = AuditLogRepo::query(&state.pool, &query).await?;
    let total = AuditLogRepo::count(&state.pool, &query).await?;

    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}

/// GET /api/v1/admin/audit-logs/export?from=X&to=Y
///
/// Export audit logs for a date range as CSV.
pub async fn export_audit_logs(
    RequireAuditor(_admin): RequireAuditor,
    State(state): State<AppState>,
    Query(params): Query<AuditLogQueryParams>,
) -> AppResult<impl IntoResponse> {
    // Export everything matching the filters, newest first.
    let query = params.into_query()?;
    let logs = AuditLogRepo::export(&state.pool, &query).await?;

    let mut lines = Vec::with_capacity(logs.len() + 1);
    lines.push(csv::build_row([
        "id",
        "created_at",
        "actor_id",
        "action_type",
        "category",
        "entity_type",
        "entity_id",
        "details",
    ]));
    for log in &logs {
        lines.push(csv::build_row([
            log.id.to_string(),
            log.created_at.to_rfc3339(),
            log.actor_id.map(|id| id.to_string()).unwrap_or_default(),
            log.action_type.clone(),
            log.category.clone(),
            log.entity_type.clone(),
            log.entity_id.map(|id| id.to_string()).unwrap_or_default(),
            log.details.to_string(),
        ]));
    }
    let body = lines.join("\n");

    let response = axum::http::Response::builder()
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            "attachment; filename=\"audit-logs.csv\"",
        )
        .body(axum::body::Body::from(body))
        .map_err(|e| AppError::InternalError(format!("Response build error: {e}")))?;
    Ok(response)
}
