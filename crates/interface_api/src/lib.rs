//! HTTP API Layer
//!
//! REST surface of the reconciliation subsystem using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for reconciliation, differences, health
//! - **Middleware**: Tenant/actor context extraction, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! Every `/api/v1` request carries its tenant in the `X-Tenant-Id` header
//! and, for mutating closure calls, its operator in `X-Actor-Id`.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_reconciliation::ReconciliationService;

use crate::config::ApiConfig;
use crate::middleware::{audit_middleware, tenant_context_middleware};
use crate::handlers::{differences, health, reconciliation};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReconciliationService>,
    pub config: ApiConfig,
    /// Present when backed by PostgreSQL; readiness then pings the database
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(service: Arc<ReconciliationService>, config: ApiConfig) -> Self {
        Self {
            service,
            config,
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no tenant context required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Per-station reconciliation routes
    let station_routes = Router::new()
        .route("/:station/reconciliation/:date", get(reconciliation::get_summary))
        .route("/:station/reconciliation/:date/closed", get(reconciliation::is_closed))
        .route("/:station/reconciliation/:date/validate", post(reconciliation::validate_close))
        .route("/:station/reconciliation/:date/close", post(reconciliation::close_day))
        .route("/:station/reconciliation/:date/close-cash", post(reconciliation::close_day_with_cash));

    // Discrepancy ledger routes
    let difference_routes = Router::new()
        .route("/", get(differences::list))
        .route("/summary", get(differences::summary))
        .route("/:id", get(differences::get));

    let api_routes = Router::new()
        .nest("/stations", station_routes)
        .route("/reconciliations/open", get(reconciliation::list_open))
        .nest("/differences", difference_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn(tenant_context_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
