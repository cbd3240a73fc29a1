//! In-memory fakes for the storage ports
//!
//! Back the domain service in tests without a database. The closure fake
//! honors the same finalize-once contract as the PostgreSQL adapter: the
//! check-and-set happens under a single lock, so of N concurrent closers
//! exactly one succeeds.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use core_kernel::{ActorId, DifferenceId, ReconciliationId, StationId, TenantId, Timezone};
use domain_reconciliation::{
    ClosureSnapshot, ClosureStore, CollectionEntry, CollectionSource, DailyReconciliation,
    DifferenceFilter, DifferenceStore, DiscrepancySummary, ReconciliationDifference,
    ReconciliationError, ReconciliationService, SaleLedger, SaleRecord, SystemCalculatedSales,
    UserEnteredCash,
};

/// Fake sale ledger over a plain vector of rows
#[derive(Default)]
pub struct InMemorySaleLedger {
    records: Mutex<Vec<SaleRecord>>,
    timezone: Timezone,
}

impl InMemorySaleLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            timezone: Timezone::ist(),
        }
    }

    pub fn push(&self, record: SaleRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn extend(&self, records: impl IntoIterator<Item = SaleRecord>) {
        self.records.lock().unwrap().extend(records);
    }

    /// Marks every matching sale as voided, as a void workflow would
    pub fn void_all(&self, station: StationId, date: NaiveDate) {
        let tz = self.timezone;
        let mut records = self.records.lock().unwrap();
        for r in records.iter_mut() {
            if r.station_id == station && tz.local_date(r.recorded_at) == date {
                r.status = domain_reconciliation::SaleStatus::Voided;
            }
        }
    }
}

#[async_trait]
impl SaleLedger for InMemorySaleLedger {
    async fn system_sales(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<SystemCalculatedSales, ReconciliationError> {
        let records = self.records.lock().unwrap();
        let day: Vec<&SaleRecord> = records
            .iter()
            .filter(|r| {
                r.tenant_id == tenant
                    && r.station_id == station
                    && self.timezone.local_date(r.recorded_at) == date
            })
            .collect();
        Ok(SystemCalculatedSales::aggregate(day))
    }
}

/// Fake collection entry source
#[derive(Default)]
pub struct InMemoryCollectionSource {
    entries: Mutex<Vec<CollectionEntry>>,
}

impl InMemoryCollectionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: CollectionEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl CollectionSource for InMemoryCollectionSource {
    async fn user_entered_cash(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<UserEnteredCash, ReconciliationError> {
        let entries = self.entries.lock().unwrap();
        let day: Vec<&CollectionEntry> = entries
            .iter()
            .filter(|e| {
                e.tenant_id == tenant && e.station_id == station && e.business_date == date
            })
            .collect();
        Ok(UserEnteredCash::from_entries(day))
    }
}

type ClosureKey = (TenantId, StationId, NaiveDate);

/// Fake closure store with the finalize-once guarantee
#[derive(Default)]
pub struct InMemoryClosureStore {
    rows: Mutex<HashMap<ClosureKey, DailyReconciliation>>,
}

impl InMemoryClosureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, finalized or not
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ClosureStore for InMemoryClosureStore {
    async fn get_or_create_open(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<DailyReconciliation, ReconciliationError> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .entry((tenant, station, date))
            .or_insert_with(|| DailyReconciliation::open(tenant, station, date));
        Ok(record.clone())
    }

    async fn find(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<Option<DailyReconciliation>, ReconciliationError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&(tenant, station, date)).cloned())
    }

    async fn finalize(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
        snapshot: ClosureSnapshot,
        closed_by: ActorId,
        closed_at: DateTime<Utc>,
    ) -> Result<ReconciliationId, ReconciliationError> {
        // Check and set under one lock, mirroring the adapter's conditional
        // UPDATE ... WHERE finalized = FALSE
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .entry((tenant, station, date))
            .or_insert_with(|| DailyReconciliation::open(tenant, station, date));

        if record.finalized {
            return Err(ReconciliationError::AlreadyClosed { station, date });
        }

        record.total_volume = snapshot.total_volume;
        record.total_sales = snapshot.total_sales;
        record.cash_sales = snapshot.cash_sales;
        record.card_sales = snapshot.card_sales;
        record.upi_sales = snapshot.upi_sales;
        record.credit_sales = snapshot.credit_sales;
        record.reported_cash = snapshot.reported_cash;
        record.variance_amount = snapshot.variance_amount;
        record.variance_reason = snapshot.variance_reason;
        record.notes = snapshot.notes;
        record.finalized = true;
        record.closed_by = Some(closed_by);
        record.closed_at = Some(closed_at);
        record.updated_at = closed_at;

        Ok(record.id)
    }

    async fn list_open(
        &self,
        tenant: TenantId,
        station: Option<StationId>,
    ) -> Result<Vec<DailyReconciliation>, ReconciliationError> {
        let rows = self.rows.lock().unwrap();
        let mut open: Vec<DailyReconciliation> = rows
            .values()
            .filter(|r| {
                r.tenant_id == tenant
                    && !r.finalized
                    && station.is_none_or(|s| r.station_id == s)
            })
            .cloned()
            .collect();
        open.sort_by(|a, b| a.business_date.cmp(&b.business_date));
        Ok(open)
    }
}

/// Fake discrepancy ledger
#[derive(Default)]
pub struct InMemoryDifferenceStore {
    rows: Mutex<Vec<(TenantId, ReconciliationDifference)>>,
}

impl InMemoryDifferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, tenant: TenantId, record: ReconciliationDifference) {
        self.rows.lock().unwrap().push((tenant, record));
    }
}

#[async_trait]
impl DifferenceStore for InMemoryDifferenceStore {
    async fn list(
        &self,
        tenant: TenantId,
        filter: DifferenceFilter,
    ) -> Result<Vec<ReconciliationDifference>, ReconciliationError> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<ReconciliationDifference> = rows
            .iter()
            .filter(|(t, r)| *t == tenant && filter.matches(r))
            .map(|(_, r)| r.clone())
            .collect();
        matched.sort_by(|a, b| b.business_date.cmp(&a.business_date));
        Ok(matched)
    }

    async fn get(
        &self,
        tenant: TenantId,
        id: DifferenceId,
    ) -> Result<ReconciliationDifference, ReconciliationError> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|(t, r)| *t == tenant && r.id == id)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| ReconciliationError::not_found("reconciliation difference", id))
    }

    async fn discrepancy_summary(
        &self,
        tenant: TenantId,
        as_of: NaiveDate,
    ) -> Result<DiscrepancySummary, ReconciliationError> {
        // Inclusive of as_of, so the window covers exactly WINDOW_DAYS calendar days.
        let window_start = as_of - Duration::days(DiscrepancySummary::WINDOW_DAYS as i64 - 1);
        let rows = self.rows.lock().unwrap();
        let window = rows
            .iter()
            .filter(|(t, r)| {
                *t == tenant && r.business_date >= window_start && r.business_date <= as_of
            })
            .map(|(_, r)| r.clone());
        Ok(DiscrepancySummary::from_window(window))
    }
}

/// Bundles the four fakes and the service wired over them
///
/// The store handles stay accessible so tests can seed data after
/// construction.
pub struct MemoryBackend {
    pub sales: Arc<InMemorySaleLedger>,
    pub collections: Arc<InMemoryCollectionSource>,
    pub closures: Arc<InMemoryClosureStore>,
    pub differences: Arc<InMemoryDifferenceStore>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            sales: Arc::new(InMemorySaleLedger::new()),
            collections: Arc::new(InMemoryCollectionSource::new()),
            closures: Arc::new(InMemoryClosureStore::new()),
            differences: Arc::new(InMemoryDifferenceStore::new()),
        }
    }

    /// A service over these fakes with the default policy and IST locality
    pub fn service(&self) -> ReconciliationService {
        ReconciliationService::new(
            self.sales.clone(),
            self.collections.clone(),
            self.closures.clone(),
            self.differences.clone(),
        )
    }
}
