//! Convenient imports for typical `empdb` usage.
//!
//! ```ignore
//! use empdb::prelude::*;
//! ```

pub use crate::{
    ConnectionSettings, Conditions, Database, DbError, DbResult, Employee, EmployeeRepository,
    FromRow, GenericClient, LogicalOperator, RowExt, ValuesToChange,
};
