//! API middleware
//!
//! Tenant and actor context extraction plus request audit logging. The
//! platform gateway authenticates callers upstream and forwards the resolved
//! identities as headers; this layer only parses and propagates them.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use core_kernel::{ActorId, TenantId};

/// Resolved tenant for the request, inserted into request extensions
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

/// Resolved operator for the request, present when `X-Actor-Id` was sent
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    pub actor_id: ActorId,
}

fn header_uuid(request: &Request<Body>, name: &str) -> Option<Uuid> {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Tenant context middleware
///
/// Every `/api/v1` request must carry a valid `X-Tenant-Id`; the optional
/// `X-Actor-Id` identifies the operator for closure audit trails.
pub async fn tenant_context_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(tenant) = header_uuid(&request, "x-tenant-id") else {
        warn!("Missing or malformed X-Tenant-Id header");
        return Err(StatusCode::BAD_REQUEST);
    };

    request.extensions_mut().insert(TenantContext {
        tenant_id: TenantId::from_uuid(tenant),
    });

    if let Some(actor) = header_uuid(&request, "x-actor-id") {
        request.extensions_mut().insert(ActorContext {
            actor_id: ActorId::from_uuid(actor),
        });
    }

    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs every API request with its tenant for compliance review.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let tenant = request
        .extensions()
        .get::<TenantContext>()
        .map(|c| c.tenant_id.to_string())
        .unwrap_or_else(|| "unresolved".to_string());

    let start = Utc::now();
    let response = next.run(request).await;
    let duration = Utc::now() - start;

    info!(
        method = %method,
        uri = %uri,
        tenant = %tenant,
        status = %response.status().as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
