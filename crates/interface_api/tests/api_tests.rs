//! HTTP API Tests
//!
//! Drives the full Axum router over the in-memory port fakes from
//! `test_utils`:
//!
//! - `health` - Liveness and readiness probes
//! - `tenancy` - `X-Tenant-Id` extraction and rejection
//! - `summaries` - Summary and open-day reads
//! - `closing` - Closure validation and the finalize endpoints
//! - `differences` - Discrepancy ledger listing, lookup, and rollup

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

use core_kernel::{Money, StationId, TenantId, Timezone};
use domain_reconciliation::{
    ClosureValidation, DifferenceStatus, DiscrepancySummary, PaymentMethod,
    ReconciliationDifference, ReconciliationSummary,
};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{
    CollectionEntryBuilder, DifferenceBuilder, IdFixtures, MemoryBackend, SaleRecordBuilder,
    TemporalFixtures,
};

fn server(backend: &MemoryBackend) -> TestServer {
    let state = AppState::new(Arc::new(backend.service()), ApiConfig::default());
    TestServer::new(create_router(state)).expect("router should build")
}

fn tenant_header(tenant: TenantId) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-tenant-id"),
        HeaderValue::from_str(&tenant.as_uuid().to_string()).unwrap(),
    )
}

fn actor_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-actor-id"),
        HeaderValue::from_str(&IdFixtures::actor_id().as_uuid().to_string()).unwrap(),
    )
}

fn summary_path(station: StationId) -> String {
    format!(
        "/api/v1/stations/{}/reconciliation/{}",
        station.as_uuid(),
        TemporalFixtures::business_date()
    )
}

/// Seeds a day with 500 cash + 300 card in sales and matching collections
fn seed_balanced_day(backend: &MemoryBackend) {
    backend.sales.extend([
        SaleRecordBuilder::new()
            .with_amount(Money::inr(dec!(500)))
            .build(),
        SaleRecordBuilder::new()
            .with_payment_method(PaymentMethod::Card)
            .with_amount(Money::inr(dec!(300)))
            .build(),
    ]);
    backend.collections.push(
        CollectionEntryBuilder::new()
            .with_cash(Money::inr(dec!(500)))
            .with_card(Money::inr(dec!(300)))
            .build(),
    );
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_check_needs_no_tenant() {
        let backend = MemoryBackend::new();
        let server = server(&backend);

        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_without_a_pool_reports_ready() {
        let backend = MemoryBackend::new();
        let server = server(&backend);

        let response = server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

mod tenancy {
    use super::*;

    #[tokio::test]
    async fn test_api_routes_reject_a_missing_tenant_header() {
        let backend = MemoryBackend::new();
        let server = server(&backend);

        let response = server.get("/api/v1/reconciliations/open").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_tenant_header_is_rejected() {
        let backend = MemoryBackend::new();
        let server = server(&backend);

        let (name, _) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .get("/api/v1/reconciliations/open")
            .add_header(name, HeaderValue::from_static("not-a-uuid"))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

mod summaries {
    use super::*;

    #[tokio::test]
    async fn test_summary_returns_derived_totals() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .get(&summary_path(IdFixtures::station_id()))
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let summary: ReconciliationSummary = response.json();
        assert_eq!(summary.system.total_revenue.amount(), dec!(800));
        assert_eq!(summary.reported.total_collected.amount(), dec!(800));
        assert!(summary.differences.within_tolerance);
        assert!(!summary.is_reconciled);
    }

    #[tokio::test]
    async fn test_first_summary_shows_up_in_the_open_backlog() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        server
            .get(&summary_path(IdFixtures::station_id()))
            .add_header(name.clone(), value.clone())
            .await;

        let response = server
            .get("/api/v1/reconciliations/open")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let open: Vec<Value> = response.json();
        assert_eq!(open.len(), 1);
        assert_eq!(
            open[0]["station_id"],
            json!(IdFixtures::station_id().as_uuid().to_string())
        );
    }

    #[tokio::test]
    async fn test_open_backlog_can_filter_by_station() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        server
            .get(&summary_path(IdFixtures::station_id()))
            .add_header(name.clone(), value.clone())
            .await;

        let response = server
            .get("/api/v1/reconciliations/open")
            .add_query_param("station_id", IdFixtures::other_station_id().as_uuid())
            .add_header(name, value)
            .await;

        let open: Vec<Value> = response.json();
        assert!(open.is_empty());
    }
}

mod closing {
    use super::*;

    #[tokio::test]
    async fn test_validate_reports_a_clean_attempt_as_valid() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .post(&format!("{}/validate", summary_path(IdFixtures::station_id())))
            .add_header(name, value)
            .json(&json!({ "reported_cash": "800" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let validation: ClosureValidation = response.json();
        assert!(validation.valid);
        assert!(validation.errors.is_empty());
    }

    #[tokio::test]
    async fn test_close_finalizes_then_conflicts_on_repeat() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (tenant_name, tenant_value) = tenant_header(IdFixtures::tenant_id());
        let (actor_name, actor_value) = actor_header();
        let path = format!("{}/close", summary_path(IdFixtures::station_id()));

        let first = server
            .post(&path)
            .add_header(tenant_name.clone(), tenant_value.clone())
            .add_header(actor_name.clone(), actor_value.clone())
            .json(&json!({ "notes": "Evening shift tally" }))
            .await;
        assert_eq!(first.status_code(), StatusCode::OK);
        let outcome: Value = first.json();
        assert!(outcome["id"].as_str().is_some());

        let probe = server
            .get(&format!("{}/closed", summary_path(IdFixtures::station_id())))
            .add_header(tenant_name.clone(), tenant_value.clone())
            .await;
        assert_eq!(probe.json::<Value>()["closed"], json!(true));

        let second = server
            .post(&path)
            .add_header(tenant_name, tenant_value)
            .add_header(actor_name, actor_value)
            .await;
        assert_eq!(second.status_code(), StatusCode::CONFLICT);
        assert_eq!(second.json::<Value>()["error"], json!("conflict"));
    }

    #[tokio::test]
    async fn test_close_without_an_actor_header_is_rejected() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .post(&format!("{}/close", summary_path(IdFixtures::station_id())))
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("X-Actor-Id"));
    }
}

mod cash_closing {
    use super::*;

    #[tokio::test]
    async fn test_unexplained_variance_returns_validation_details() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (tenant_name, tenant_value) = tenant_header(IdFixtures::tenant_id());
        let (actor_name, actor_value) = actor_header();
        let response = server
            .post(&format!("{}/close-cash", summary_path(IdFixtures::station_id())))
            .add_header(tenant_name.clone(), tenant_value.clone())
            .add_header(actor_name, actor_value)
            .json(&json!({ "reported_cash": "790" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["error"], json!("validation_error"));
        let details = body["details"].as_array().unwrap();
        assert!(details
            .iter()
            .any(|d| d.as_str().unwrap().contains("variance reason")));

        // The failed attempt must not finalize the day
        let probe = server
            .get(&format!("{}/closed", summary_path(IdFixtures::station_id())))
            .add_header(tenant_name, tenant_value)
            .await;
        assert_eq!(probe.json::<Value>()["closed"], json!(false));
    }

    #[tokio::test]
    async fn test_explained_variance_closes_the_day() {
        let backend = MemoryBackend::new();
        seed_balanced_day(&backend);
        let server = server(&backend);

        let (tenant_name, tenant_value) = tenant_header(IdFixtures::tenant_id());
        let (actor_name, actor_value) = actor_header();
        let response = server
            .post(&format!("{}/close-cash", summary_path(IdFixtures::station_id())))
            .add_header(tenant_name.clone(), tenant_value.clone())
            .add_header(actor_name, actor_value)
            .json(&json!({
                "reported_cash": "790",
                "variance_reason": "Till was short after a refund"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let probe = server
            .get(&format!("{}/closed", summary_path(IdFixtures::station_id())))
            .add_header(tenant_name, tenant_value)
            .await;
        assert_eq!(probe.json::<Value>()["closed"], json!(true));
    }
}

mod differences {
    use super::*;

    fn today() -> chrono::NaiveDate {
        Timezone::ist().local_date(Utc::now())
    }

    fn seed_ledger(backend: &MemoryBackend) -> ReconciliationDifference {
        let short = DifferenceBuilder::new()
            .with_business_date(today())
            .with_reported(Money::inr(dec!(900)))
            .with_actual(Money::inr(dec!(1000)))
            .build();
        backend
            .differences
            .push(IdFixtures::tenant_id(), short.clone());
        backend.differences.push(
            IdFixtures::tenant_id(),
            DifferenceBuilder::new().with_business_date(today()).build(),
        );
        short
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let backend = MemoryBackend::new();
        seed_ledger(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .get("/api/v1/differences")
            .add_query_param("status", "short")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let rows: Vec<ReconciliationDifference> = response.json();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, DifferenceStatus::Short);
    }

    #[tokio::test]
    async fn test_unknown_status_filter_is_a_bad_request() {
        let backend = MemoryBackend::new();
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .get("/api/v1/differences")
            .add_query_param("status", "sideways")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_miss() {
        let backend = MemoryBackend::new();
        let seeded = seed_ledger(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let hit = server
            .get(&format!("/api/v1/differences/{}", seeded.id.as_uuid()))
            .add_header(name.clone(), value.clone())
            .await;
        assert_eq!(hit.status_code(), StatusCode::OK);
        let row: ReconciliationDifference = hit.json();
        assert_eq!(row.id, seeded.id);

        let miss = server
            .get(&format!("/api/v1/differences/{}", Uuid::now_v7()))
            .add_header(name, value)
            .await;
        assert_eq!(miss.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary_rolls_up_the_trailing_window() {
        let backend = MemoryBackend::new();
        seed_ledger(&backend);
        let server = server(&backend);

        let (name, value) = tenant_header(IdFixtures::tenant_id());
        let response = server
            .get("/api/v1/differences/summary")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let rollup: DiscrepancySummary = response.json();
        assert_eq!(rollup.window_days, DiscrepancySummary::WINDOW_DAYS);
        assert_eq!(rollup.mismatch_count, 1);
        assert_eq!(rollup.short_count, 1);
        assert_eq!(rollup.recent.len(), 1);
    }
}
