//! Reconciliation handlers
//!
//! Summary reads, pre-flight validation, and the two closure variants.
//! Closure endpoints require an `X-Actor-Id` header so the audit trail
//! records who finalized the day.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use core_kernel::{ActorId, Money, StationId};
use domain_reconciliation::{ClosureValidation, ReconciliationSummary};

use crate::dto::reconciliation::{
    CloseCashRequest, CloseDayRequest, CloseOutcomeResponse, ClosedStateResponse,
    OpenDayResponse, ValidateCloseRequest,
};
use crate::error::ApiError;
use crate::middleware::{ActorContext, TenantContext};
use crate::AppState;

fn require_actor(actor: Option<Extension<ActorContext>>) -> Result<ActorId, ApiError> {
    actor
        .map(|Extension(ctx)| ctx.actor_id)
        .ok_or_else(|| ApiError::BadRequest("Missing X-Actor-Id header".to_string()))
}

/// Builds the full reconciliation summary for a station day
pub async fn get_summary(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path((station, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<ReconciliationSummary>, ApiError> {
    let summary = state
        .service
        .get_summary(tenant.tenant_id, StationId::from_uuid(station), date)
        .await?;
    Ok(Json(summary))
}

/// Reports whether the day is already finalized
pub async fn is_closed(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path((station, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<ClosedStateResponse>, ApiError> {
    let closed = state
        .service
        .is_day_closed(tenant.tenant_id, StationId::from_uuid(station), date)
        .await?;
    Ok(Json(ClosedStateResponse { closed }))
}

/// Non-mutating pre-flight check for a closure attempt
pub async fn validate_close(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path((station, date)): Path<(Uuid, NaiveDate)>,
    Json(request): Json<ValidateCloseRequest>,
) -> Result<Json<ClosureValidation>, ApiError> {
    let validation = state
        .service
        .validate_closure_attempt(
            tenant.tenant_id,
            StationId::from_uuid(station),
            date,
            Money::inr(request.reported_cash),
        )
        .await;
    Ok(Json(validation))
}

/// Finalizes the day from a freshly derived snapshot
pub async fn close_day(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    actor: Option<Extension<ActorContext>>,
    Path((station, date)): Path<(Uuid, NaiveDate)>,
    request: Option<Json<CloseDayRequest>>,
) -> Result<Json<CloseOutcomeResponse>, ApiError> {
    let actor = require_actor(actor)?;
    let notes = request.and_then(|Json(r)| r.notes);

    let outcome = state
        .service
        .close_day(
            tenant.tenant_id,
            StationId::from_uuid(station),
            date,
            actor,
            notes,
        )
        .await?;

    Ok(Json(CloseOutcomeResponse {
        id: *outcome.id.as_uuid(),
        warnings: outcome.warnings,
    }))
}

/// Finalizes the day from a single reported-cash figure
pub async fn close_day_with_cash(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    actor: Option<Extension<ActorContext>>,
    Path((station, date)): Path<(Uuid, NaiveDate)>,
    Json(request): Json<CloseCashRequest>,
) -> Result<Json<CloseOutcomeResponse>, ApiError> {
    let actor = require_actor(actor)?;

    let outcome = state
        .service
        .close_day_with_cash(
            tenant.tenant_id,
            StationId::from_uuid(station),
            date,
            Money::inr(request.reported_cash),
            request.variance_reason,
            actor,
        )
        .await?;

    Ok(Json(CloseOutcomeResponse {
        id: *outcome.id.as_uuid(),
        warnings: outcome.warnings,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenDaysQuery {
    pub station_id: Option<Uuid>,
}

/// Days materialized but not yet finalized, oldest first
pub async fn list_open(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<OpenDaysQuery>,
) -> Result<Json<Vec<OpenDayResponse>>, ApiError> {
    let open = state
        .service
        .list_open_days(tenant.tenant_id, query.station_id.map(StationId::from_uuid))
        .await?;

    Ok(Json(open.into_iter().map(OpenDayResponse::from).collect()))
}
