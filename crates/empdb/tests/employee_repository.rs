mod common;

use empdb::{Conditions, DbError, DbResult, EmployeeRepository, Employee, ValuesToChange};
use rust_decimal::Decimal;
use std::str::FromStr;

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

#[tokio::test]
async fn crud_roundtrip() -> DbResult<()> {
    let Some(t) = common::try_setup("crud_roundtrip").await? else {
        return Ok(());
    };
    let repo = EmployeeRepository::new(&t.db);

    let seeded = repo.get_all().await?;
    assert_eq!(seeded.len(), 7);
    assert!(seeded.windows(2).all(|w| w[0].id() < w[1].id()));

    let jan = Employee::new(0, "Kowalski", "Jan", "jankowalski@gmail.com", "HR", decimal("3000.00"));
    let new_id = repo.insert(&jan).await?;
    assert!(seeded.iter().all(|e| e.id() != new_id));

    // Matches the seeded Jan Kowalski and the inserted one, but not John Doe:
    // AND binds tighter than OR.
    let renamed = repo
        .update(
            &ValuesToChange::new().set("last_name", "Nowak").set("first_name", "Robert"),
            &Conditions::new()
                .or("first_name = 'Nobody'")
                .and("first_name = 'Jan'")
                .last("last_name = 'Kowalski'"),
        )
        .await?;
    assert_eq!(renamed, 2);

    let all = repo.get_all().await?;
    let inserted = all.iter().find(|e| e.id() == new_id).expect("inserted row");
    assert_eq!(inserted.first_name(), "Robert");
    assert_eq!(inserted.last_name(), "Nowak");
    assert_eq!(inserted.salary(), decimal("3000.00"));

    let deleted = repo
        .delete(&Conditions::new().last(&format!("id = {new_id}")))
        .await?;
    assert_eq!(deleted, 1);
    assert_eq!(repo.get_all().await?.len(), 7);

    t.teardown().await
}

#[tokio::test]
async fn stored_procedures() -> DbResult<()> {
    let Some(t) = common::try_setup("stored_procedures").await? else {
        return Ok(());
    };
    let repo = EmployeeRepository::new(&t.db);

    assert_eq!(
        repo.greet_department("HR").await?,
        "Hello to the awesome HR team!"
    );

    assert_eq!(repo.get_count_for_department("Engineering").await?, 3);
    assert_eq!(repo.get_count_for_department("Nowhere").await?, 0);

    let engineers = repo.get_employees_for_department("Engineering").await?;
    assert_eq!(engineers.len(), 3);
    assert!(engineers.iter().all(|e| e.department() == "Engineering"));

    let before: Vec<Decimal> = repo
        .get_employees_for_department("HR")
        .await?
        .iter()
        .map(Employee::salary)
        .collect();
    repo.increase_salaries_for_department("HR", decimal("3000.0"))
        .await?;
    let after: Vec<Decimal> = repo
        .get_employees_for_department("HR")
        .await?
        .iter()
        .map(Employee::salary)
        .collect();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(&after) {
        assert_eq!(*a - *b, decimal("3000"));
    }

    t.teardown().await
}

#[tokio::test]
async fn large_objects_roundtrip() -> DbResult<()> {
    let Some(t) = common::try_setup("large_objects_roundtrip").await? else {
        return Ok(());
    };
    let repo = EmployeeRepository::new(&t.db);
    let dir = tempfile::tempdir()?;

    // Seed row 2 is Mary Public.
    assert_eq!(repo.get_employee_resume(2, dir.path()).await?, None);

    let resume: Vec<u8> = (0..=255_u8).cycle().take(4096).collect();
    let resume_path = dir.path().join("sample_resume.pdf");
    std::fs::write(&resume_path, &resume)?;
    assert_eq!(repo.add_employee_resume(&resume_path, 2).await?, 1);

    let copy = repo
        .get_employee_resume(2, dir.path())
        .await?
        .expect("resume copy written");
    assert_eq!(copy.file_name().and_then(|n| n.to_str()), Some("Mary_Public_COPY.pdf"));
    assert_eq!(std::fs::read(&copy)?, resume);

    let note = "Line one\nŁódź, zażółć gęślą jaźń\n".repeat(200);
    let note_path = dir.path().join("big_note_sample.txt");
    std::fs::write(&note_path, &note)?;
    assert_eq!(repo.add_employee_big_note(&note_path, 2).await?, 1);

    let copy = repo
        .get_employee_big_note(2, dir.path())
        .await?
        .expect("note copy written");
    assert_eq!(
        copy.file_name().and_then(|n| n.to_str()),
        Some("Mary_Public_BIG_NOTE_COPY.txt")
    );
    assert_eq!(std::fs::read_to_string(&copy)?, note);

    let missing = repo.get_employee_resume(9_999, dir.path()).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));

    t.teardown().await
}
