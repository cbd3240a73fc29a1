//! Infrastructure Database Layer
//!
//! PostgreSQL implementation of the reconciliation storage ports using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and the
//! row types, adapters translate between repositories and the domain port
//! traits. Every query runs against the tenant's own schema, resolved by
//! [`PartitionResolver`] before any data is touched.
//!
//! Queries are checked at runtime rather than by the `sqlx::query!` macros so
//! the workspace builds without a live database; table names cannot be bound
//! as parameters anyway once there is a schema per tenant.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, PostgresReconciliationAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/fuel_recon")).await?;
//! let adapter = PostgresReconciliationAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod tenancy;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, create_pool_from_url, run_migrations};
pub use error::DatabaseError;
pub use tenancy::PartitionResolver;
pub use adapters::PostgresReconciliationAdapter;
