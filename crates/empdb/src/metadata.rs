//! Database, table, column and result-set introspection.

use crate::client::GenericClient;
use crate::error::DbResult;
use crate::row::RowExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name reported for the client library talking to the server.
pub const DRIVER_NAME: &str = "tokio-postgres";
/// Version line of [`DRIVER_NAME`] this crate is built against.
pub const DRIVER_VERSION: &str = "0.7";

/// Server product and client driver identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInformation {
    product_name: String,
    product_version: String,
    driver_name: String,
    driver_version: String,
}

impl DatabaseInformation {
    pub fn builder() -> DatabaseInformationBuilder {
        DatabaseInformationBuilder::default()
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn driver_version(&self) -> &str {
        &self.driver_version
    }
}

/// Builder for [`DatabaseInformation`]; unset fields stay empty.
#[derive(Debug, Clone, Default)]
pub struct DatabaseInformationBuilder {
    product_name: String,
    product_version: String,
    driver_name: String,
    driver_version: String,
}

impl DatabaseInformationBuilder {
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    pub fn product_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = version.into();
        self
    }

    pub fn driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    pub fn driver_version(mut self, version: impl Into<String>) -> Self {
        self.driver_version = version.into();
        self
    }

    pub fn build(self) -> DatabaseInformation {
        DatabaseInformation {
            product_name: self.product_name,
            product_version: self.product_version,
            driver_name: self.driver_name,
            driver_version: self.driver_version,
        }
    }
}

/// Identify the connected server and the driver.
pub async fn database_information<C: GenericClient>(client: &C) -> DbResult<DatabaseInformation> {
    let row = client
        .query_one(
            "SELECT current_setting('server_version') AS product_version",
            &[],
        )
        .await?;

    Ok(DatabaseInformation::builder()
        .product_name("PostgreSQL")
        .product_version(row.try_get_column::<String>("product_version")?)
        .driver_name(DRIVER_NAME)
        .driver_version(DRIVER_VERSION)
        .build())
}

/// Names of tables visible on the connection.
///
/// `None` disables a filter. `schema_pattern` and `table_pattern` are SQL
/// `LIKE` patterns. `types` holds `information_schema` table types
/// (`BASE TABLE`, `VIEW`, ...); `TABLE` is accepted as `BASE TABLE`.
pub async fn table_names<C: GenericClient>(
    client: &C,
    catalog: Option<&str>,
    schema_pattern: Option<&str>,
    table_pattern: Option<&str>,
    types: Option<&[&str]>,
) -> DbResult<BTreeSet<String>> {
    let types: Option<Vec<String>> = types.map(|types| {
        types
            .iter()
            .map(|t| match *t {
                "TABLE" => "BASE TABLE".to_string(),
                other => other.to_string(),
            })
            .collect()
    });

    let rows = client
        .query(
            r#"
SELECT table_name::text AS table_name
FROM information_schema.tables
WHERE ($1::text IS NULL OR table_catalog::text = $1)
  AND ($2::text IS NULL OR table_schema::text LIKE $2)
  AND ($3::text IS NULL OR table_name::text LIKE $3)
  AND ($4::text[] IS NULL OR table_type::text = ANY($4))
"#,
            &[&catalog, &schema_pattern, &table_pattern, &types],
        )
        .await?;

    rows.iter()
        .map(|row| row.try_get_column::<String>("table_name"))
        .collect()
}

/// Names of the columns of `table`.
///
/// `None` disables a filter; `schema_pattern` and `column_pattern` are SQL
/// `LIKE` patterns.
pub async fn column_names<C: GenericClient>(
    client: &C,
    table: &str,
    catalog: Option<&str>,
    schema_pattern: Option<&str>,
    column_pattern: Option<&str>,
) -> DbResult<BTreeSet<String>> {
    let rows = client
        .query(
            r#"
SELECT column_name::text AS column_name
FROM information_schema.columns
WHERE table_name::text = $1
  AND ($2::text IS NULL OR table_catalog::text = $2)
  AND ($3::text IS NULL OR table_schema::text LIKE $3)
  AND ($4::text IS NULL OR column_name::text LIKE $4)
"#,
            &[&table, &catalog, &schema_pattern, &column_pattern],
        )
        .await?;

    rows.iter()
        .map(|row| row.try_get_column::<String>("column_name"))
        .collect()
}

/// Whether a result column can hold NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    NoNulls,
    Nullable,
    /// Computed columns with no backing table column.
    Unknown,
}

/// Description of one column of a query's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub type_name: String,
    pub nullable: Nullability,
    pub auto_increment: bool,
    pub read_only: bool,
}

/// Describe the columns `query` would return.
///
/// The query is prepared, never executed, so it cannot change data.
pub async fn result_set_metadata<C: GenericClient>(
    client: &C,
    query: &str,
) -> DbResult<Vec<ColumnMetadata>> {
    let statement = client.prepare_statement(query).await?;
    let mut columns = Vec::with_capacity(statement.columns().len());

    for column in statement.columns() {
        let mut meta = ColumnMetadata {
            name: column.name().to_string(),
            type_name: column.type_().name().to_string(),
            nullable: Nullability::Unknown,
            auto_increment: false,
            read_only: true,
        };

        if let (Some(table_oid), Some(column_id)) = (column.table_oid(), column.column_id()) {
            let row = client
                .query_opt(
                    r#"
SELECT
  a.attnotnull AS not_null,
  (a.attidentity::text <> '' OR COALESCE(pg_get_expr(d.adbin, d.adrelid), '') LIKE 'nextval(%') AS auto_increment,
  (a.attgenerated::text <> '') AS generated
FROM pg_catalog.pg_attribute a
LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
WHERE a.attrelid = $1 AND a.attnum = $2
"#,
                    &[&table_oid, &column_id],
                )
                .await?;

            if let Some(row) = row {
                let not_null: bool = row.try_get_column("not_null")?;
                meta.nullable = if not_null {
                    Nullability::NoNulls
                } else {
                    Nullability::Nullable
                };
                meta.auto_increment = row.try_get_column("auto_increment")?;
                meta.read_only = row.try_get_column("generated")?;
            }
        }

        columns.push(meta);
    }

    tracing::debug!(query, columns = columns.len(), "result set described");
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_every_field() {
        let info = DatabaseInformation::builder()
            .product_name("PostgreSQL")
            .product_version("16.4")
            .driver_name(DRIVER_NAME)
            .driver_version(DRIVER_VERSION)
            .build();

        assert_eq!(info.product_name(), "PostgreSQL");
        assert_eq!(info.product_version(), "16.4");
        assert_eq!(info.driver_name(), "tokio-postgres");
        assert_eq!(info.driver_version(), "0.7");
    }

    #[test]
    fn column_metadata_serializes_nullability_in_snake_case() {
        let column = ColumnMetadata {
            name: "id".to_string(),
            type_name: "int4".to_string(),
            nullable: Nullability::NoNulls,
            auto_increment: true,
            read_only: false,
        };
        assert_eq!(
            serde_json::to_string(&column).unwrap(),
            r#"{"name":"id","type_name":"int4","nullable":"no_nulls","auto_increment":true,"read_only":false}"#
        );

        let info = DatabaseInformation::builder().product_name("PostgreSQL").build();
        let back: DatabaseInformation =
            serde_json::from_str(&serde_json::to_string(&info).unwrap()).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn builder_defaults_are_empty() {
        let info = DatabaseInformation::builder().product_name("PostgreSQL").build();
        assert_eq!(info.product_version(), "");
        assert_eq!(info.driver_name(), "");
    }
}
