//! Discrepancy ledger handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::DifferenceId;
use domain_reconciliation::{DiscrepancySummary, ReconciliationDifference};

use crate::dto::differences::DifferenceListQuery;
use crate::error::ApiError;
use crate::middleware::TenantContext;
use crate::AppState;

/// Filtered listing of discrepancy rows, most recent first
pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<DifferenceListQuery>,
) -> Result<Json<Vec<ReconciliationDifference>>, ApiError> {
    let filter = query
        .into_filter()
        .map_err(|raw| ApiError::BadRequest(format!("Unknown difference status '{raw}'")))?;

    let rows = state.service.list_differences(tenant.tenant_id, filter).await?;
    Ok(Json(rows))
}

/// Single discrepancy row by id
pub async fn get(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconciliationDifference>, ApiError> {
    let row = state
        .service
        .get_difference(tenant.tenant_id, DifferenceId::from_uuid(id))
        .await?;
    Ok(Json(row))
}

/// Trailing-30-day dashboard rollup
pub async fn summary(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<DiscrepancySummary>, ApiError> {
    let rollup = state.service.discrepancy_summary(tenant.tenant_id).await?;
    Ok(Json(rollup))
}
