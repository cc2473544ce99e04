//! Shared setup for database-backed tests.
//!
//! Each test gets its own throwaway PostgreSQL schema holding the table, the
//! routines and the seed rows, so tests can run in parallel against one server.

#![allow(dead_code)]

use empdb::{ConnectionSettings, Database, DbResult, GenericClient, schema};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct TestDb {
    pub db: Database,
    pub schema: String,
    pub url: String,
}

/// Connect to `DATABASE_URL` and prepare an isolated schema, or `None` when unset.
pub async fn try_setup(test_name: &str) -> DbResult<Option<TestDb>> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test_name}");
            return Ok(None);
        }
    };

    let db = Database::connect(&ConnectionSettings::from_url(database_url.clone())).await?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let schema_name = format!("empdb_test_{}_{}", std::process::id(), nanos);

    db.batch_execute(&format!(
        "CREATE SCHEMA {schema_name}; SET search_path TO {schema_name}"
    ))
    .await?;
    db.install_schema().await?;
    schema::seed(&db).await?;

    Ok(Some(TestDb {
        db,
        schema: schema_name,
        url: database_url,
    }))
}

impl TestDb {
    pub async fn teardown(self) -> DbResult<()> {
        let mut db = self.db;
        db.set_auto_commit(true).await?;
        db.batch_execute(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .await?;
        db.close().await
    }
}
