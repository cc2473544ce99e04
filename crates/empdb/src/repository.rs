//! Employee data access: CRUD, stored procedures and large objects.
//!
//! ```ignore
//! use empdb::{Database, EmployeeRepository};
//!
//! let repo = EmployeeRepository::new(&db);
//! for employee in repo.get_employees_for_department("Engineering").await? {
//!     println!("{employee}");
//! }
//! ```

use crate::client::GenericClient;
use crate::employee::Employee;
use crate::error::{DbError, DbResult};
use crate::query_builder::{Conditions, ValuesToChange, create_delete_query, create_update_query};
use crate::row::{FromRow, RowExt};
use crate::schema::EMPLOYEES_TABLE;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};

const RESUME_SUFFIX: &str = "_COPY.pdf";
const BIG_NOTE_SUFFIX: &str = "_BIG_NOTE_COPY.txt";

/// Employee operations over any [`GenericClient`].
pub struct EmployeeRepository<'a, C: GenericClient> {
    client: &'a C,
}

impl<'a, C: GenericClient> EmployeeRepository<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    // ==================== CRUD ====================

    /// Every employee, ordered by id.
    pub async fn get_all(&self) -> DbResult<Vec<Employee>> {
        let rows = self
            .client
            .query("SELECT * FROM employees ORDER BY id", &[])
            .await?;
        Employee::from_rows(&rows)
    }

    /// Insert `employee` and return the generated id. The record's own id is ignored.
    pub async fn insert(&self, employee: &Employee) -> DbResult<i32> {
        let sql = "INSERT INTO employees (last_name, first_name, email, department, salary) \
                   VALUES ($1, $2, $3, $4, $5) RETURNING id";
        let salary = employee.salary();
        let row = self
            .client
            .query_one(
                sql,
                &[
                    &employee.last_name(),
                    &employee.first_name(),
                    &employee.email(),
                    &employee.department(),
                    &salary,
                ],
            )
            .await?;
        log_rows_affected(sql, 1);
        row.try_get_column("id")
    }

    /// Run a built `UPDATE employees SET ... WHERE ...`.
    pub async fn update(&self, values: &ValuesToChange, conditions: &Conditions) -> DbResult<u64> {
        let sql = create_update_query(EMPLOYEES_TABLE, values, conditions);
        let rows = self.client.execute(&sql, &[]).await?;
        log_rows_affected(&sql, rows);
        Ok(rows)
    }

    /// Run a built `DELETE FROM employees WHERE ...`.
    pub async fn delete(&self, conditions: &Conditions) -> DbResult<u64> {
        let sql = create_delete_query(EMPLOYEES_TABLE, conditions);
        let rows = self.client.execute(&sql, &[]).await?;
        log_rows_affected(&sql, rows);
        Ok(rows)
    }

    // ==================== Stored procedures ====================

    /// `CALL increase_salaries_for_department(department, amount)`.
    pub async fn increase_salaries_for_department(
        &self,
        department: &str,
        amount: Decimal,
    ) -> DbResult<()> {
        self.client
            .execute(
                "CALL increase_salaries_for_department($1, $2)",
                &[&department, &amount],
            )
            .await?;
        tracing::info!(
            "Salaries for employees in department {department} increased by {amount:.2}"
        );
        Ok(())
    }

    /// `CALL greet_the_department(INOUT department)`, returning the greeting.
    pub async fn greet_department(&self, department: &str) -> DbResult<String> {
        let row = self
            .client
            .query_one("CALL greet_the_department($1)", &[&department])
            .await?;
        let greeting: String = row.try_get_column("department")?;
        tracing::debug!(%greeting, "greet_the_department returned");
        Ok(greeting)
    }

    /// `CALL get_count_for_department(department, OUT count)`.
    pub async fn get_count_for_department(&self, department: &str) -> DbResult<i32> {
        let row = self
            .client
            .query_one("CALL get_count_for_department($1, NULL)", &[&department])
            .await?;
        Ok(row
            .try_get_column::<Option<i32>>("the_count")?
            .unwrap_or_default())
    }

    /// Employees returned by the `get_employees_for_department` routine.
    pub async fn get_employees_for_department(&self, department: &str) -> DbResult<Vec<Employee>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM get_employees_for_department($1)",
                &[&department],
            )
            .await?;
        Employee::from_rows(&rows)
    }

    // ==================== Large objects ====================

    /// Store the file at `path` in the `resume` (bytea) column.
    pub async fn add_employee_resume(&self, path: impl AsRef<Path>, id: i32) -> DbResult<u64> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let rows = self
            .client
            .execute("UPDATE employees SET resume = $1 WHERE id = $2", &[&bytes, &id])
            .await?;
        tracing::info!(id, bytes = bytes.len(), rows, "resume stored");
        Ok(rows)
    }

    /// Write the stored resume to `<out_dir>/<first>_<last>_COPY.pdf`.
    ///
    /// Returns `Ok(None)` when the employee has no resume.
    pub async fn get_employee_resume(
        &self,
        id: i32,
        out_dir: impl AsRef<Path>,
    ) -> DbResult<Option<PathBuf>> {
        let row = self
            .client
            .query_opt(
                "SELECT first_name, last_name, resume FROM employees WHERE id = $1",
                &[&id],
            )
            .await?
            .ok_or_else(|| DbError::not_found(format!("employee {id}")))?;

        let Some(resume) = row.try_get_column::<Option<Vec<u8>>>("resume")? else {
            tracing::warn!(id, "employee has no resume stored");
            return Ok(None);
        };

        let path = copy_path(&row, out_dir.as_ref(), RESUME_SUFFIX)?;
        write_copy(path.clone(), resume).await?;
        tracing::info!(id, path = %path.display(), "resume copied");
        Ok(Some(path))
    }

    /// Store the text file at `path` in the `big_note` (text) column.
    pub async fn add_employee_big_note(&self, path: impl AsRef<Path>, id: i32) -> DbResult<u64> {
        let note = tokio::fs::read_to_string(path.as_ref()).await?;
        let rows = self
            .client
            .execute("UPDATE employees SET big_note = $1 WHERE id = $2", &[&note, &id])
            .await?;
        tracing::info!(id, chars = note.chars().count(), rows, "big note stored");
        Ok(rows)
    }

    /// Write the stored note to `<out_dir>/<first>_<last>_BIG_NOTE_COPY.txt`.
    ///
    /// Returns `Ok(None)` when the employee has no note.
    pub async fn get_employee_big_note(
        &self,
        id: i32,
        out_dir: impl AsRef<Path>,
    ) -> DbResult<Option<PathBuf>> {
        let row = self
            .client
            .query_opt(
                "SELECT first_name, last_name, big_note FROM employees WHERE id = $1",
                &[&id],
            )
            .await?
            .ok_or_else(|| DbError::not_found(format!("employee {id}")))?;

        let Some(note) = row.try_get_column::<Option<String>>("big_note")? else {
            tracing::warn!(id, "employee has no big note stored");
            return Ok(None);
        };

        let path = copy_path(&row, out_dir.as_ref(), BIG_NOTE_SUFFIX)?;
        write_copy(path.clone(), note.into_bytes()).await?;
        tracing::info!(id, path = %path.display(), "big note copied");
        Ok(Some(path))
    }
}

fn log_rows_affected(sql: &str, rows: u64) {
    tracing::info!("Row(s) affected: ({rows}) by query: {sql}");
}

/// `<out_dir>/<first>_<last><suffix>`, with path separators in names replaced.
fn copy_path(row: &tokio_postgres::Row, out_dir: &Path, suffix: &str) -> DbResult<PathBuf> {
    let first: Option<String> = row.try_get_column("first_name")?;
    let last: Option<String> = row.try_get_column("last_name")?;
    Ok(out_dir.join(copy_file_name(
        first.as_deref().unwrap_or_default(),
        last.as_deref().unwrap_or_default(),
        suffix,
    )))
}

fn copy_file_name(first: &str, last: &str, suffix: &str) -> String {
    let clean = |s: &str| s.replace(|c: char| c == '/' || c == '\\', "_");
    format!("{}_{}{suffix}", clean(first), clean(last))
}

async fn write_copy(path: PathBuf, contents: Vec<u8>) -> DbResult<()> {
    tokio::task::spawn_blocking(move || -> DbResult<()> {
        let mut file = std::fs::File::create(&path)?;
        let written = file.write_all(&contents);
        let close_failure = crate::close!(Some(&mut file));
        written?;
        close_failure.map_or(Ok(()), Err)
    })
    .await
    .map_err(|e| DbError::Other(format!("file writer task failed: {e}")))?
}
