//! The fixed walk-through printed by `empdb`.
//!
//! Each section prints to stdout and ends with a separator. A failing section
//! is logged and the walk-through moves on to the next one.

use crate::cli::RunArgs;
use crate::config::resolve_settings;
use anyhow::Context;
use empdb::metadata::{self, ColumnMetadata, Nullability};
use empdb::schema::{self, EMPLOYEES_TABLE};
use empdb::{Conditions, Database, DbResult, Employee, EmployeeRepository, ValuesToChange};
use rust_decimal::Decimal;
use std::io::BufRead;
use std::path::Path;

const SEPARATOR: &str = "\n------------------------------------\n";
const CONFIRM_PROMPT: &str = "Are you sure that you want to update salary? Type \"yes\" for commit!";
const PROCEDURE_DEPARTMENT: &str = "Engineering";

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let settings = resolve_settings(
        args.database.as_deref(),
        std::env::var("DATABASE_URL").ok(),
        &args.config,
    )?;

    let mut db = Database::connect(&settings)
        .await
        .context("problem with opening connection")?;

    if args.init_schema {
        db.install_schema().await?;
        schema::seed(&db).await?;
    }

    section("database metadata", print_database_metadata(&db).await);
    section("tables", print_tables(&db).await);
    section("columns", print_employee_columns(&db).await);
    section("update", update_example(&db).await);
    section("insert", insert_example(&db).await);
    section("delete", delete_example(&db).await);
    section("select", select_example(&db).await);
    procedures_example(&db).await;
    section("query metadata", print_query_metadata(&db).await);
    large_object_example(&db, &args).await;
    section(
        "transaction",
        transaction_example(&mut db, args.assume_yes, std::io::stdin().lock()).await,
    );

    db.close().await.context("failed to close connection")?;
    println!("Connection closed");
    Ok(())
}

fn section(name: &str, result: DbResult<()>) {
    report(name, result);
    println!("{SEPARATOR}");
}

fn report(name: &str, result: DbResult<()>) {
    if let Err(e) = result {
        let e = anyhow::Error::from(e);
        tracing::error!("something is wrong with the {name} example: {e:#}");
    }
}

async fn print_database_metadata(db: &Database) -> DbResult<()> {
    let info = metadata::database_information(db).await?;
    println!("Driver name: {}", info.driver_name());
    println!("Driver version: {}", info.driver_version());
    println!("Product name: {}", info.product_name());
    println!("Product version: {}", info.product_version());
    Ok(())
}

async fn print_tables(db: &Database) -> DbResult<()> {
    println!("TABLES IN DATABASE:\n");
    for table in metadata::table_names(db, None, Some("public"), None, Some(&["TABLE"])).await? {
        println!("{table}");
    }
    Ok(())
}

async fn print_employee_columns(db: &Database) -> DbResult<()> {
    println!("COLUMNS IN {EMPLOYEES_TABLE} TABLE:\n");
    for column in metadata::column_names(db, EMPLOYEES_TABLE, None, None, None).await? {
        println!("{column}");
    }
    Ok(())
}

fn example_conditions() -> Conditions {
    Conditions::new()
        .or("first_name = 'John'")
        .and("first_name = 'Jan'")
        .last("last_name = 'Kowalski'")
}

async fn update_example(db: &Database) -> DbResult<()> {
    let values = ValuesToChange::new()
        .set("last_name", "Nowak")
        .set("first_name", "Robert");
    EmployeeRepository::new(db)
        .update(&values, &example_conditions())
        .await?;
    Ok(())
}

async fn insert_example(db: &Database) -> DbResult<()> {
    let employee = Employee::new(
        1,
        "Kowalski",
        "Jan",
        "jankowalski@gmail.com",
        "HR",
        Decimal::new(30000, 1),
    );
    let id = EmployeeRepository::new(db).insert(&employee).await?;
    println!("New employee id: {id}");
    Ok(())
}

async fn delete_example(db: &Database) -> DbResult<()> {
    EmployeeRepository::new(db)
        .delete(&example_conditions())
        .await?;
    Ok(())
}

async fn select_example(db: &Database) -> DbResult<()> {
    for employee in EmployeeRepository::new(db).get_all().await? {
        println!("{employee}");
    }
    Ok(())
}

async fn procedures_example(db: &Database) {
    let repo = EmployeeRepository::new(db);

    section(
        "greeting procedure",
        repo.greet_department("HR")
            .await
            .map(|greeting| println!("{}", greeting_line(&greeting))),
    );

    section(
        "salary increase procedure",
        repo.increase_salaries_for_department("HR", Decimal::new(30000, 1))
            .await,
    );

    section(
        "department listing",
        repo.get_employees_for_department(PROCEDURE_DEPARTMENT)
            .await
            .map(|employees| employees.iter().for_each(|e| println!("{e}"))),
    );

    section(
        "department count procedure",
        repo.get_count_for_department(PROCEDURE_DEPARTMENT)
            .await
            .map(|count| println!("{PROCEDURE_DEPARTMENT} department has {count} employees!")),
    );
}

fn greeting_line(greeting: &str) -> String {
    format!("The result of greeting: {greeting}")
}

async fn print_query_metadata(db: &Database) -> DbResult<()> {
    let query = format!("SELECT * FROM {EMPLOYEES_TABLE}");
    for column in metadata::result_set_metadata(db, &query).await? {
        print!("{}", describe_column(&column));
    }
    Ok(())
}

fn describe_column(column: &ColumnMetadata) -> String {
    let nullable = match column.nullable {
        Nullability::NoNulls => "no",
        Nullability::Nullable => "yes",
        Nullability::Unknown => "unknown",
    };
    format!(
        "Column name: {}\nColumn type: {}\nIs nullable: {nullable}\nIs autoincrement: {}\nIs read only: {}\n\n",
        column.name, column.type_name, column.auto_increment, column.read_only
    )
}

async fn large_object_example(db: &Database, args: &RunArgs) {
    let repo = EmployeeRepository::new(db);
    let id = args.employee_id;

    report(
        "blob [writing]",
        repo.add_employee_resume(&args.resume, id).await.map(|_| {
            println!("Successfully added resume!");
        }),
    );
    report(
        "blob [reading]",
        repo.get_employee_resume(id, &args.out_dir)
            .await
            .map(|copy| print_copy("resume", copy.as_deref())),
    );
    println!("{SEPARATOR}");

    report(
        "clob [writing]",
        repo.add_employee_big_note(&args.note, id).await.map(|_| {
            println!("Successfully added big note!");
        }),
    );
    report(
        "clob [reading]",
        repo.get_employee_big_note(id, &args.out_dir)
            .await
            .map(|copy| print_copy("big note", copy.as_deref())),
    );
    println!("{SEPARATOR}");
}

fn print_copy(what: &str, copy: Option<&Path>) {
    match copy {
        Some(path) => println!("Successfully received {what} copy: {}", path.display()),
        None => println!("No {what} stored for this employee"),
    }
}

async fn transaction_example(
    db: &mut Database,
    assume_yes: bool,
    input: impl BufRead,
) -> DbResult<()> {
    let values = ValuesToChange::new().set("salary", Decimal::new(30000, 1));
    let conditions = Conditions::new().last("department = 'HR'");

    db.set_auto_commit(false).await?;

    if let Err(e) = EmployeeRepository::new(&*db).update(&values, &conditions).await {
        db.rollback().await?;
        db.set_auto_commit(true).await?;
        return Err(e);
    }

    println!("{CONFIRM_PROMPT}");
    let confirmed = if assume_yes {
        println!("yes");
        true
    } else {
        read_confirmation(input)?
    };

    if confirmed {
        db.commit().await?;
        println!("COMMIT!");
    } else {
        db.rollback().await?;
        println!("ROLLBACK!");
    }

    db.set_auto_commit(true).await
}

/// True only when the next line is exactly `yes`.
fn read_confirmation(mut input: impl BufRead) -> std::io::Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']) == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_requires_exact_yes() {
        assert!(read_confirmation("yes\n".as_bytes()).unwrap());
        assert!(read_confirmation("yes\r\n".as_bytes()).unwrap());
        assert!(read_confirmation("yes".as_bytes()).unwrap());

        assert!(!read_confirmation("YES\n".as_bytes()).unwrap());
        assert!(!read_confirmation(" yes\n".as_bytes()).unwrap());
        assert!(!read_confirmation("no\n".as_bytes()).unwrap());
        assert!(!read_confirmation("".as_bytes()).unwrap());
    }

    #[test]
    fn greeting_carries_result_prefix() {
        assert_eq!(
            greeting_line("Hello to the awesome HR team!"),
            "The result of greeting: Hello to the awesome HR team!"
        );
    }

    #[test]
    fn column_description_lists_every_attribute() {
        let column = ColumnMetadata {
            name: "id".to_string(),
            type_name: "int4".to_string(),
            nullable: Nullability::NoNulls,
            auto_increment: true,
            read_only: false,
        };
        assert_eq!(
            describe_column(&column),
            "Column name: id\nColumn type: int4\nIs nullable: no\n\
             Is autoincrement: true\nIs read only: false\n\n"
        );
    }

    #[test]
    fn example_conditions_render_in_order() {
        assert_eq!(
            example_conditions().to_sql(),
            "first_name = 'John' OR first_name = 'Jan' AND last_name = 'Kowalski'"
        );
    }
}
