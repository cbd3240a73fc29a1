//! Core Kernel - Foundational types for the fuel-station reconciliation system
//!
//! This crate provides the building blocks shared by every domain and
//! infrastructure crate:
//! - Money types with precise decimal arithmetic (INR-first)
//! - Business-day and timezone handling for station-local calendar days
//! - Strongly-typed identifiers

pub mod money;
pub mod temporal;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{BusinessDay, Timezone};
pub use identifiers::{
    TenantId, StationId, NozzleId, SaleId, CollectionEntryId, CreditorId,
    ReconciliationId, DifferenceId, ActorId,
};
