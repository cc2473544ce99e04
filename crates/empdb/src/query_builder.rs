//! Text-rendered UPDATE/DELETE statements built from ordered condition lists.
//!
//! Unlike the parameterized queries in [`repository`](crate::repository), the
//! statements produced here are plain SQL text: values in the `SET` clause are
//! rendered as literals and each WHERE condition is a raw SQL fragment
//! supplied by the caller.
//!
//! ```ignore
//! use empdb::query_builder::{Conditions, ValuesToChange, create_update_query};
//!
//! let values = ValuesToChange::new()
//!     .set("last_name", "Nowak")
//!     .set("salary", 3000);
//!
//! let conditions = Conditions::new()
//!     .or("first_name = 'John'")
//!     .and("first_name = 'Jan'")
//!     .last("last_name = 'Kowalski'");
//!
//! assert_eq!(
//!     create_update_query("employees", &values, &conditions),
//!     "UPDATE employees SET last_name='Nowak', salary=3000 \
//!      WHERE first_name = 'John' OR first_name = 'Jan' AND last_name = 'Kowalski'"
//! );
//! ```

use rust_decimal::Decimal;
use std::fmt;

/// Connector appended after a WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Nothing appended; belongs on the last condition.
    WithoutOperation,
}

impl LogicalOperator {
    /// SQL keyword for this connector, `None` for [`LogicalOperator::WithoutOperation`].
    pub fn as_sql(self) -> Option<&'static str> {
        match self {
            LogicalOperator::And => Some("AND"),
            LogicalOperator::Or => Some("OR"),
            LogicalOperator::WithoutOperation => None,
        }
    }
}

/// A value rendered as a SQL literal in a `SET` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float32(f32),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl SqlValue {
    /// Render the value as SQL text.
    ///
    /// Text is single-quoted (embedded quotes doubled); everything else uses
    /// its plain textual form.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(true) => "TRUE".to_string(),
            SqlValue::Bool(false) => "FALSE".to_string(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Float32(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Decimal(v) => v.to_string(),
            SqlValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_literal())
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float32(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Ordered `column = value` pairs for an UPDATE's SET clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuesToChange {
    values: Vec<(String, SqlValue)>,
}

impl ValuesToChange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column assignment. Order of calls is the order rendered.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.values.push((column.to_string(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<C: Into<String>, V: Into<SqlValue>> FromIterator<(C, V)> for ValuesToChange {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(c, v)| (c.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered WHERE conditions, each paired with the connector that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    items: Vec<(String, LogicalOperator)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw SQL condition followed by `op`.
    pub fn push(mut self, condition: &str, op: LogicalOperator) -> Self {
        self.items.push((condition.to_string(), op));
        self
    }

    /// Append `condition AND`.
    pub fn and(self, condition: &str) -> Self {
        self.push(condition, LogicalOperator::And)
    }

    /// Append `condition OR`.
    pub fn or(self, condition: &str) -> Self {
        self.push(condition, LogicalOperator::Or)
    }

    /// Append the closing condition (no connector).
    pub fn last(self, condition: &str) -> Self {
        self.push(condition, LogicalOperator::WithoutOperation)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LogicalOperator)> {
        self.items.iter().map(|(c, op)| (c.as_str(), *op))
    }

    /// Render the conditions without the leading `WHERE` keyword.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        let last = self.items.len().saturating_sub(1);

        for (i, (condition, op)) in self.items.iter().enumerate() {
            sql.push_str(condition);
            if i == last {
                if *op != LogicalOperator::WithoutOperation {
                    tracing::warn!(
                        condition = %condition,
                        connector = ?op,
                        "last WHERE condition carries a connector; dropping it"
                    );
                }
                break;
            }
            sql.push(' ');
            if let Some(keyword) = op.as_sql() {
                sql.push_str(keyword);
                sql.push(' ');
            }
        }

        sql
    }
}

impl<S: Into<String>> FromIterator<(S, LogicalOperator)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (S, LogicalOperator)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|(c, op)| (c.into(), op)).collect(),
        }
    }
}

fn push_where(sql: &mut String, conditions: &Conditions) {
    sql.push_str(" WHERE");
    if !conditions.is_empty() {
        sql.push(' ');
        sql.push_str(&conditions.to_sql());
    }
}

/// Build `UPDATE <table> SET c1=v1, c2=v2 WHERE ...`.
///
/// An empty `values` list or condition list yields SQL the server rejects;
/// nothing here guards against either.
pub fn create_update_query(table: &str, values: &ValuesToChange, conditions: &Conditions) -> String {
    let set_clause = values
        .iter()
        .map(|(column, value)| format!("{column}={}", value.to_sql_literal()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("UPDATE {table} SET {set_clause}");
    push_where(&mut sql, conditions);
    sql
}

/// Build `DELETE FROM <table> WHERE ...`.
pub fn create_delete_query(table: &str, conditions: &Conditions) -> String {
    let mut sql = format!("DELETE FROM {table}");
    push_where(&mut sql, conditions);
    sql
}
