//! The employee record.

use crate::error::DbResult;
use crate::row::{FromRow, RowExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_postgres::Row;

/// One row of the `employees` table, without its large-object columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    id: i32,
    last_name: String,
    first_name: String,
    email: String,
    department: String,
    salary: Decimal,
}

impl Employee {
    pub fn new(
        id: i32,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        salary: Decimal,
    ) -> Self {
        Self {
            id,
            last_name: last_name.into(),
            first_name: first_name.into(),
            email: email.into(),
            department: department.into(),
            salary,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn set_department(&mut self, department: impl Into<String>) {
        self.department = department.into();
    }

    pub fn salary(&self) -> Decimal {
        self.salary
    }

    pub fn set_salary(&mut self, salary: Decimal) {
        self.salary = salary;
    }
}

impl FromRow for Employee {
    fn from_row(row: &Row) -> DbResult<Self> {
        // Nullable text columns read as empty strings.
        let text = |column: &str| -> DbResult<String> {
            Ok(row
                .try_get_column::<Option<String>>(column)?
                .unwrap_or_default())
        };

        Ok(Self {
            id: row.try_get_column("id")?,
            last_name: text("last_name")?,
            first_name: text("first_name")?,
            email: text("email")?,
            department: text("department")?,
            salary: row
                .try_get_column::<Option<Decimal>>("salary")?
                .unwrap_or_default(),
        })
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee{{id={}, last_name='{}', first_name='{}', email='{}', department='{}', salary={}}}",
            self.id, self.last_name, self.first_name, self.email, self.department, self.salary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn jan() -> Employee {
        Employee::new(
            1,
            "Kowalski",
            "Jan",
            "jankowalski@gmail.com",
            "HR",
            Decimal::from_str("3000.00").unwrap(),
        )
    }

    #[test]
    fn display_lists_every_field() {
        assert_eq!(
            jan().to_string(),
            "Employee{id=1, last_name='Kowalski', first_name='Jan', \
             email='jankowalski@gmail.com', department='HR', salary=3000.00}"
        );
    }

    #[test]
    fn serializes_with_field_names() {
        let json = serde_json::to_value(jan()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["last_name"], "Kowalski");
        assert_eq!(json["department"], "HR");

        let back: Employee = serde_json::from_value(json).unwrap();
        assert_eq!(back, jan());
    }

    #[test]
    fn setters_leave_id_alone() {
        let mut employee = jan();
        employee.set_last_name("Nowak");
        employee.set_first_name("Robert");
        employee.set_email("robert.nowak@example.com");
        employee.set_department("Engineering");
        employee.set_salary(Decimal::new(450_050, 2));

        assert_eq!(employee.id(), 1);
        assert_eq!(employee.last_name(), "Nowak");
        assert_eq!(employee.first_name(), "Robert");
        assert_eq!(employee.email(), "robert.nowak@example.com");
        assert_eq!(employee.department(), "Engineering");
        assert_eq!(employee.salary().to_string(), "4500.50");
    }
}
