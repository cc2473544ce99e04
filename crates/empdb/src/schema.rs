//! Bundled DDL for the `employees` table and its server-side routines.

use crate::client::GenericClient;
use crate::error::DbResult;

/// Table, procedures and the set-returning listing function.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Demo rows; a no-op when the table already has data.
pub const SEED_SQL: &str = include_str!("../sql/seed.sql");

/// Table name every repository statement targets.
pub const EMPLOYEES_TABLE: &str = "employees";

/// Apply [`SCHEMA_SQL`].
pub async fn install(client: &impl GenericClient) -> DbResult<()> {
    client.batch_execute(SCHEMA_SQL).await?;
    tracing::info!("employee schema installed");
    Ok(())
}

/// Apply [`SEED_SQL`].
pub async fn seed(client: &impl GenericClient) -> DbResult<()> {
    client.batch_execute(SEED_SQL).await?;
    tracing::debug!("employee seed applied");
    Ok(())
}
