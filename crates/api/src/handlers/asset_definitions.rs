//! Handlers for the `/asset-definitions` resource: CRUD, filtered listing,
//! CSV export, and multipart CSV bulk import.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::depreciation;
use inventra_core::error::CoreError;
use inventra_core::importer::{self, ImportContext, ImportSummary, RowError};
use inventra_core::roles::Action;
use inventra_core::status::AssetStatus;
use inventra_core::csv;
use inventra_core::types::{Date, DbId};
use inventra_db::models::asset_definition::{
    AssetDefinition, AssetSearchParams, CreateAssetDefinition, UpdateAssetDefinition,
};
use inventra_db::models::asset_type::AssetType;
use inventra_db::repositories::{AssetDefinitionRepo, AssetTypeRepo, LocationRepo};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Current book value of an asset, when its type depreciates.
fn depreciated_value(
    asset_type: &AssetType,
    asset_value: Decimal,
    purchase_date: Option<Date>,
    as_of: Date,
) -> Option<Decimal> {
    if !asset_type.depreciation_applicable {
        return None;
    }
    let life = asset_type.asset_life_months?;
    let purchased = purchase_date?;
    Some(depreciation::straight_line_value(
        asset_value,
        life,
        purchased,
        as_of,
    ))
}

async fn load_active_type(state: &AppState, id: DbId) -> AppResult<AssetType> {
    let asset_type = AssetTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id,
        }))?;
    if asset_type.status_id != inventra_core::status::AssetTypeStatus::Active.id() {
        return Err(AppError::Core(CoreError::Validation(
            "Asset type is inactive".into(),
        )));
    }
    Ok(asset_type)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/asset-definitions
///
/// List/search assets with optional filters.
pub async fn list_assets(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> AppResult<impl IntoResponse> {
    let assets = AssetDefinitionRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/v1/asset-definitions/{id}
pub async fn get_asset(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssetDefinition>>> {
    let asset = AssetDefinitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset definition",
            id,
        }))?;
    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/asset-definitions
///
/// Register a new asset. The initial book value is computed when the type
/// depreciates and a purchase date is known.
pub async fn create_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAssetDefinition>,
) -> AppResult<(StatusCode, Json<DataResponse<AssetDefinition>>)> {
    auth.require(Action::ManageAssetDefinitions)?;

    if input.asset_code.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Asset code and name must not be empty".into(),
        )));
    }
    if input.asset_value < Decimal::ZERO {
        return Err(AppError::Core(CoreError::Validation(
            "asset_value must not be negative".into(),
        )));
    }

    let asset_type = load_active_type(&state, input.asset_type_id).await?;
    let today = chrono::Utc::now().date_naive();
    let book_value = depreciated_value(&asset_type, input.asset_value, input.purchase_date, today);

    let asset = AssetDefinitionRepo::create(&state.pool, &input, book_value).await?;

    tracing::info!(
        asset_id = asset.id,
        asset_code = %asset.asset_code,
        user_id = auth.user_id,
        "Asset registered",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_CREATE,
        "asset_definition",
        asset.id,
        serde_json::json!({ "asset_code": asset.asset_code }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// PUT /api/v1/asset-definitions/{id}
///
/// Update an asset's mutable fields. Allocation state cannot be changed
/// here: allocated assets reject updates, and the Allocated status cannot
/// be set directly.
pub async fn update_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssetDefinition>,
) -> AppResult<Json<DataResponse<AssetDefinition>>> {
    auth.require(Action::ManageAssetDefinitions)?;

    if input.status_id == Some(AssetStatus::Allocated.id()) {
        return Err(AppError::Core(CoreError::Validation(
            "Allocation status is managed by the allocation workflow".into(),
        )));
    }

    let existing = AssetDefinitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset definition",
            id,
        }))?;

    // Recompute the book value against the post-update figures.
    let asset_type = AssetTypeRepo::find_by_id(&state.pool, existing.asset_type_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset type",
            id: existing.asset_type_id,
        }))?;
    let today = chrono::Utc::now().date_naive();
    let value = input.asset_value.unwrap_or(existing.asset_value);
    let purchased = input.purchase_date.or(existing.purchase_date);
    let book_value = depreciated_value(&asset_type, value, purchased, today);

    let asset = AssetDefinitionRepo::update(&state.pool, id, &input, book_value)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Asset is currently allocated and cannot be edited".into(),
            ))
        })?;

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset updated");
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_UPDATE,
        "asset_definition",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/asset-definitions/{id}
///
/// Delete an asset that has never been allocated.
pub async fn delete_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(Action::ManageAssetDefinitions)?;

    let deleted = AssetDefinitionRepo::delete(&state.pool, id).await?;
    if !deleted {
        // Either missing, or it has an allocation history worth keeping.
        let exists = AssetDefinitionRepo::find_by_id(&state.pool, id).await?.is_some();
        if exists {
            return Err(AppError::Core(CoreError::Conflict(
                "Asset with allocation history cannot be deleted".into(),
            )));
        }
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset definition",
            id,
        }));
    }

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset deleted");
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_DELETE,
        "asset_definition",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/asset-definitions/export
///
/// Export the (filtered) asset register as CSV.
pub async fn export_assets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> AppResult<impl IntoResponse> {
    auth.require(Action::ExportData)?;

    // Export ignores pagination: dump everything matching the filters.
    let assets = AssetDefinitionRepo::export(&state.pool, &params).await?;

    let mut lines = Vec::with_capacity(assets.len() + 1);
    lines.push(csv::build_row([
        "asset_code",
        "asset_type_code",
        "name",
        "status",
        "asset_value",
        "current_depreciation_value",
        "purchase_date",
        "location",
        "allocated_to",
        "remarks",
    ]));
    for asset in &assets {
        lines.push(csv::build_row([
            asset.asset_code.clone(),
            asset.type_code.clone(),
            asset.name.clone(),
            asset.status_name.clone(),
            asset.asset_value.to_string(),
            asset
                .current_depreciation_value
                .map(|v| v.to_string())
                .unwrap_or_default(),
            asset
                .purchase_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            asset.location_name.clone().unwrap_or_default(),
            asset
                .allocated_to
                .map(|id| id.to_string())
                .unwrap_or_default(),
            asset.remarks.clone().unwrap_or_default(),
        ]));
    }
    let body = lines.join("\n");

    tracing::info!(user_id = auth.user_id, rows = assets.len(), "Asset register exported");

    let response = axum::http::Response::builder()
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            "attachment; filename=\"asset-definitions.csv\"",
        )
        .body(axum::body::Body::from(body))
        .map_err(|e| AppError::InternalError(format!("Response build error: {e}")))?;
    Ok(response)
}

// ---------------------------------------------------------------------------
// Bulk import
// ---------------------------------------------------------------------------

/// POST /api/v1/asset-definitions/import
///
/// Bulk import assets from a multipart CSV upload (`file` field). Rows are
/// validated and inserted independently: a failing row is reported with its
/// row number and does not abort the rest.
pub async fn import_assets(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    auth.require(Action::BulkImportAssets)?;

    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            file = Some(bytes.to_vec());
        }
    }
    let file = file.ok_or_else(|| {
        AppError::BadRequest("Multipart upload must contain a 'file' field".into())
    })?;

    // Catalog lookups the rows are validated against.
    let ctx = ImportContext {
        asset_types_by_code: AssetTypeRepo::codes_to_ids(&state.pool).await?,
        locations_by_name: LocationRepo::names_to_ids(&state.pool).await?,
        existing_asset_codes: AssetDefinitionRepo::all_codes(&state.pool).await?,
    };

    let (rows, mut errors) = importer::parse_asset_import(&file, &ctx)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    let total_rows = rows.len() + errors.len();

    // Insert row by row; each row stands alone.
    let today = chrono::Utc::now().date_naive();
    let mut successful = 0usize;
    for row in &rows {
        let asset_type = AssetTypeRepo::find_by_id(&state.pool, row.asset_type_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Asset type",
                id: row.asset_type_id,
            }))?;
        let book_value = depreciated_value(&asset_type, row.asset_value, row.purchase_date, today);

        match AssetDefinitionRepo::insert_imported(
            &state.pool,
            row,
            asset_type.assigned_asset_manager_id,
            book_value,
        )
        .await
        {
            Ok(_) => successful += 1,
            Err(error) => errors.push(RowError {
                row: row.row,
                error: format!("Insert failed: {error}"),
            }),
        }
    }

    errors.sort_by_key(|e| e.row);
    let summary = ImportSummary::new(total_rows, successful, errors);

    tracing::info!(
        user_id = auth.user_id,
        total_rows = summary.total_rows,
        successful = summary.successful_imports,
        failed = summary.failed_imports,
        "Bulk asset import finished",
    );
    record_audit(
        &state,
        auth.user_id,
        action_types::BULK_IMPORT,
        "asset_definition",
        0,
        serde_json::json!({
            "total_rows": summary.total_rows,
            "successful_imports": summary.successful_imports,
            "failed_imports": summary.failed_imports,
        }),
    )
    .await;

    Ok(Json(summary))
}

/// GET /api/v1/asset-definitions/stock-summary
///
/// Asset counts per status, for administrators watching the pool.
pub async fn stock_summary(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = AssetDefinitionRepo::count_by_status(&state.pool).await?;
    let summary: Vec<serde_json::Value> = counts
        .iter()
        .map(|(status_id, count)| {
            let name = AssetStatus::from_id(*status_id).map(AssetStatus::name);
            serde_json::json!({
                "status_id": status_id,
                "status": name,
                "count": count,
            })
        })
        .collect();
    Ok(Json(DataResponse { data: summary }))
}
