//! Handlers for the singleton `/company-profile` resource.

use axum::extract::State;
use axum::Json;
use inventra_core::audit::action_types;
use inventra_core::roles::Action;
use inventra_db::models::company::{CompanyProfile, UpdateCompanyProfile};
use inventra_db::repositories::CompanyProfileRepo;

use crate::error::AppResult;
use crate::handlers::record_audit;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/company-profile
pub async fn get_profile(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CompanyProfile>>> {
    let profile = CompanyProfileRepo::get(&state.pool).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/company-profile
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateCompanyProfile>,
) -> AppResult<Json<DataResponse<CompanyProfile>>> {
    auth.require(Action::ManageCompanyProfile)?;

    let profile = CompanyProfileRepo::update(&state.pool, &input).await?;

    tracing::info!(user_id = auth.user_id, "Company profile updated");
    record_audit(
        &state,
        auth.user_id,
        action_types::ENTITY_UPDATE,
        "company_profile",
        profile.id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: profile }))
}
