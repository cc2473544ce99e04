//! # empdb
//!
//! A small PostgreSQL data-access layer around a single `employees` table.
//!
//! ## Features
//!
//! - **CRUD**: list, insert (returning the generated id), and text-built UPDATE/DELETE
//! - **Stored procedures**: IN, INOUT and OUT parameters plus a set-returning routine
//! - **Large objects**: store and export `bytea` resumes and `text` notes
//! - **Metadata**: server/driver identification, table and column listing, result-set description
//! - **Manual transactions**: JDBC-style auto-commit toggle with commit/rollback
//! - **Resource closing**: close several fallible resources, keeping the first failure
//!
//! ## Example
//!
//! ```ignore
//! use empdb::prelude::*;
//!
//! let settings = ConnectionSettings::load("database.properties")?;
//! let db = Database::connect(&settings).await?;
//! let repo = EmployeeRepository::new(&db);
//!
//! let conditions = Conditions::new()
//!     .or("first_name = 'John'")
//!     .and("first_name = 'Jan'")
//!     .last("last_name = 'Kowalski'");
//! let values = ValuesToChange::new().set("last_name", "Nowak");
//! repo.update(&values, &conditions).await?;
//!
//! for employee in repo.get_all().await? {
//!     println!("{employee}");
//! }
//! db.close().await?;
//! ```

pub mod client;
pub mod closer;
pub mod config;
pub mod database;
pub mod employee;
pub mod error;
pub mod metadata;
pub mod prelude;
pub mod query_builder;
pub mod repository;
pub mod row;
pub mod schema;

pub use client::GenericClient;
pub use closer::{Close, close_all};
pub use config::{ConnectionSettings, Properties};
pub use database::Database;
pub use employee::Employee;
pub use error::{DbError, DbResult};
pub use metadata::{ColumnMetadata, DatabaseInformation, Nullability};
pub use query_builder::{
    Conditions, LogicalOperator, SqlValue, ValuesToChange, create_delete_query,
    create_update_query,
};
pub use repository::EmployeeRepository;
pub use row::{FromRow, RowExt};
