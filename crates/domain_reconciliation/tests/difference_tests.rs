//! Discrepancy Ledger Tests
//!
//! Exercises the difference queries and the dashboard rollup through the
//! service over the in-memory store.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;

use core_kernel::{DifferenceId, Money, Timezone};
use domain_reconciliation::{DifferenceFilter, DifferenceStatus};
use test_utils::{DifferenceBuilder, IdFixtures, MemoryBackend};

fn today() -> NaiveDate {
    Timezone::ist().local_date(Utc::now())
}

#[tokio::test]
async fn test_list_is_scoped_by_tenant_and_filter() {
    let backend = MemoryBackend::new();
    let tenant = IdFixtures::tenant_id();

    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_reported(Money::inr(dec!(1050)))
            .build(),
    );
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_station(IdFixtures::other_station_id())
            .with_reported(Money::inr(dec!(900)))
            .build(),
    );
    backend.differences.push(
        IdFixtures::other_tenant_id(),
        DifferenceBuilder::new().with_reported(Money::inr(dec!(2000))).build(),
    );

    let service = backend.service();

    let all = service.list_differences(tenant, DifferenceFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let one_station = service
        .list_differences(
            tenant,
            DifferenceFilter {
                station_id: Some(IdFixtures::station_id()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(one_station.len(), 1);
    assert_eq!(one_station[0].status, DifferenceStatus::Over);

    let shorts = service
        .list_differences(
            tenant,
            DifferenceFilter {
                status: Some(DifferenceStatus::Short),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(shorts.len(), 1);
    assert_eq!(shorts[0].difference.amount(), dec!(-100));
}

#[tokio::test]
async fn test_get_miss_is_not_found() {
    let backend = MemoryBackend::new();
    let service = backend.service();

    let err = service
        .get_difference(IdFixtures::tenant_id(), DifferenceId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_summary_counts_only_the_trailing_window() {
    let backend = MemoryBackend::new();
    let tenant = IdFixtures::tenant_id();

    // Two mismatches inside the window, one match, one stale mismatch
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_business_date(today() - Duration::days(2))
            .with_reported(Money::inr(dec!(1075)))
            .build(),
    );
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_business_date(today() - Duration::days(10))
            .with_reported(Money::inr(dec!(940)))
            .build(),
    );
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_business_date(today() - Duration::days(5))
            .build(),
    );
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_business_date(today() - Duration::days(45))
            .with_reported(Money::inr(dec!(500)))
            .build(),
    );

    let service = backend.service();
    let summary = service.discrepancy_summary(tenant).await.unwrap();

    assert_eq!(summary.window_days, 30);
    assert_eq!(summary.mismatch_count, 2);
    assert_eq!(summary.over_count, 1);
    assert_eq!(summary.short_count, 1);
    assert_eq!(summary.largest_difference.unwrap().amount(), dec!(75));
    assert_eq!(summary.recent.len(), 2);
}

#[tokio::test]
async fn test_window_spans_exactly_thirty_days() {
    let backend = MemoryBackend::new();
    let tenant = IdFixtures::tenant_id();

    // 29 days back is the oldest day inside a 30-day window ending today
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_business_date(today() - Duration::days(29))
            .with_reported(Money::inr(dec!(1050)))
            .build(),
    );
    backend.differences.push(
        tenant,
        DifferenceBuilder::new()
            .with_business_date(today() - Duration::days(30))
            .with_reported(Money::inr(dec!(900)))
            .build(),
    );

    let service = backend.service();
    let summary = service.discrepancy_summary(tenant).await.unwrap();

    assert_eq!(summary.mismatch_count, 1);
    assert_eq!(summary.over_count, 1);
    assert_eq!(summary.short_count, 0);
}
