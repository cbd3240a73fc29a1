//! Tenant partition resolution
//!
//! Each tenant's reconciliation data lives in its own PostgreSQL schema.
//! Schema names cannot be bound as query parameters, so every repository
//! formats the resolved schema into its SQL. The resolver builds the name
//! exclusively from the hex form of the tenant UUID, which keeps the
//! formatted identifier injection-safe by construction.

use core_kernel::TenantId;

/// Maps a tenant identifier to its schema name
#[derive(Debug, Clone)]
pub struct PartitionResolver {
    prefix: &'static str,
}

impl Default for PartitionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionResolver {
    pub fn new() -> Self {
        Self { prefix: "tenant_" }
    }

    /// Returns the schema name for a tenant, e.g.
    /// `tenant_0188a7f2c3d84e55b6a91f0e2d443c17`
    ///
    /// The UUID is rendered in simple (hyphen-free, lowercase hex) form, so
    /// the result contains only `[a-z0-9_]` regardless of input.
    pub fn schema(&self, tenant: TenantId) -> String {
        format!("{}{}", self.prefix, tenant.as_uuid().simple())
    }

    /// Returns a schema-qualified table reference for use in formatted SQL
    pub fn table(&self, tenant: TenantId, table: &str) -> String {
        format!("{}.{}", self.schema(tenant), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_schema_name_is_hex_only() {
        let tenant = TenantId::from_uuid(Uuid::parse_str("0188a7f2-c3d8-4e55-b6a9-1f0e2d443c17").unwrap());
        let schema = PartitionResolver::new().schema(tenant);

        assert_eq!(schema, "tenant_0188a7f2c3d84e55b6a91f0e2d443c17");
        assert!(schema.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn test_qualified_table_reference() {
        let tenant = TenantId::from_uuid(Uuid::nil());
        let table = PartitionResolver::new().table(tenant, "daily_reconciliations");
        assert_eq!(
            table,
            "tenant_00000000000000000000000000000000.daily_reconciliations"
        );
    }

    #[test]
    fn test_distinct_tenants_get_distinct_schemas() {
        let resolver = PartitionResolver::new();
        let a = resolver.schema(TenantId::new());
        let b = resolver.schema(TenantId::new());
        assert_ne!(a, b);
    }
}
