//! The single long-lived connection and its manual transaction control.
//!
//! `Database` starts in auto-commit mode: every statement commits on its own.
//! Turning auto-commit off opens an explicit transaction that stays open until
//! [`Database::commit`] or [`Database::rollback`], each of which immediately
//! opens the next one, mirroring how a JDBC-style connection behaves.
//!
//! # Example
//!
//! ```ignore
//! use empdb::{ConnectionSettings, Database};
//!
//! let mut db = Database::connect(&ConnectionSettings::load("database.properties")?).await?;
//! db.set_auto_commit(false).await?;
//! db.execute("UPDATE employees SET salary = 3000 WHERE department = 'HR'", &[]).await?;
//! db.rollback().await?;
//! db.close().await?;
//! ```

use crate::client::GenericClient;
use crate::config::ConnectionSettings;
use crate::error::{DbError, DbResult};
use crate::schema;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row, Statement};

/// A connected client plus the task driving its socket.
pub struct Database {
    client: tokio_postgres::Client,
    driver: JoinHandle<()>,
    auto_commit: bool,
}

impl Database {
    /// Open a connection and spawn its driver task.
    pub async fn connect(settings: &ConnectionSettings) -> DbResult<Self> {
        let config = settings.to_pg_config()?;
        let url = settings.redacted_url();

        let (client, connection) = config.connect(NoTls).await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "problem with opening connection");
            DbError::Connection(format!("{url}: {e}"))
        })?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection error");
            }
        });

        tracing::info!(url = %url, "successfully connected to database");
        Ok(Self {
            client,
            driver,
            auto_commit: true,
        })
    }

    /// The underlying `tokio_postgres` client.
    pub fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Toggle auto-commit.
    ///
    /// Turning it off issues `BEGIN`. Turning it back on while a transaction is
    /// open commits that transaction first.
    pub async fn set_auto_commit(&mut self, enabled: bool) -> DbResult<()> {
        if enabled == self.auto_commit {
            return Ok(());
        }
        if enabled {
            self.client.batch_execute("COMMIT").await.map_err(DbError::from_db_error)?;
        } else {
            self.client.batch_execute("BEGIN").await.map_err(DbError::from_db_error)?;
        }
        self.auto_commit = enabled;
        tracing::debug!(auto_commit = enabled, "auto-commit changed");
        Ok(())
    }

    /// Commit the open transaction and begin the next one.
    pub async fn commit(&mut self) -> DbResult<()> {
        self.end_transaction("COMMIT").await
    }

    /// Roll back the open transaction and begin the next one.
    pub async fn rollback(&mut self) -> DbResult<()> {
        self.end_transaction("ROLLBACK").await
    }

    async fn end_transaction(&mut self, verb: &str) -> DbResult<()> {
        if self.auto_commit {
            return Err(DbError::Transaction(format!(
                "{verb} requested while auto-commit is enabled"
            )));
        }
        self.client.batch_execute(verb).await.map_err(DbError::from_db_error)?;
        self.client.batch_execute("BEGIN").await.map_err(DbError::from_db_error)?;
        tracing::info!("{verb}");
        Ok(())
    }

    /// Create the `employees` table and routines if they are missing.
    pub async fn install_schema(&self) -> DbResult<()> {
        schema::install(self).await
    }

    /// Close the connection.
    ///
    /// An open manual transaction is rolled back first.
    pub async fn close(self) -> DbResult<()> {
        let Self {
            client,
            driver,
            auto_commit,
        } = self;

        if !auto_commit {
            tracing::warn!("closing with an open transaction; rolling back");
            client.batch_execute("ROLLBACK").await.map_err(DbError::from_db_error)?;
        }

        drop(client);
        driver
            .await
            .map_err(|e| DbError::Connection(format!("connection task failed: {e}")))?;
        tracing::debug!("connection closed");
        Ok(())
    }
}

impl GenericClient for Database {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        GenericClient::query(&self.client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        GenericClient::execute(&self.client, sql, params).await
    }

    async fn batch_execute(&self, sql: &str) -> DbResult<()> {
        GenericClient::batch_execute(&self.client, sql).await
    }

    async fn prepare_statement(&self, sql: &str) -> DbResult<Statement> {
        self.client.prepare_statement(sql).await
    }
}
