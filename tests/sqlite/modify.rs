use typeq::prelude::*;
use typeq::{Error, Operation, Result};

use crate::common::schema::{Company, ContractsFor, Employee, Invoice};
use crate::common::{seeded_db, setup_db};

#[test]
fn insert_returning_generated_key() -> Result<()> {
    let db = seeded_db();

    let key = db.insert_returning_key(&Company::new("Umbrella"))?;
    assert_eq!(key, 4);
    assert_eq!(db.find::<Company>(&key)?.name, "Umbrella");
    Ok(())
}

#[test]
fn insert_returning_composite_key() -> Result<()> {
    let db = seeded_db();

    let key = db.insert_returning_key(&ContractsFor::new(5, 2, "advisor"))?;
    assert_eq!(key, (5, 2));
    assert_eq!(db.find::<ContractsFor>(&key)?.role, "advisor");
    Ok(())
}

#[test]
fn insert_all_reports_rows() -> Result<()> {
    let db = setup_db();

    let inserted = db.insert_all(&[Company::new("Acme"), Company::new("Globex")])?;
    assert_eq!(inserted, 2);
    assert_eq!(db.all::<Company>()?.count(&db)?, 2);
    Ok(())
}

#[test]
fn update_overwrites_non_key_columns() -> Result<()> {
    let db = seeded_db();

    let mut dan = db.find::<Employee>(&4)?;
    dan.salary = 90;
    dan.company = ForeignKey::new(1);
    dan.manager = Some(ForeignKey::new(1));
    assert_eq!(db.update(&dan)?, 1);

    let reloaded = db.find::<Employee>(&4)?;
    assert_eq!(reloaded, dan);
    assert_eq!(reloaded.company.value(&db)?.name, "Acme");

    let ghost = Employee {
        id: 99,
        ..Employee::new("Ghost", 1, None, 1)
    };
    assert_eq!(db.update(&ghost)?, 0);
    Ok(())
}

#[test]
fn find_by_key() -> Result<()> {
    let db = seeded_db();

    assert_eq!(db.find::<Employee>(&3)?.name, "Carol");
    assert_eq!(db.find::<Invoice>(&4)?.amount, 1000);
    assert!(matches!(db.find::<Employee>(&42), Err(Error::NotFound)));
    Ok(())
}

#[test]
fn driver_errors_name_the_operation() -> Result<()> {
    let db = seeded_db();

    // duplicate composite primary key
    let duplicate = db.insert(&ContractsFor::new(1, 1, "again"));
    assert!(matches!(
        duplicate,
        Err(Error::Driver {
            operation: Operation::Modify,
            ..
        })
    ));

    // foreign key enforcement comes from the database
    let orphan = db.insert(&Employee::new("Orphan", 9, None, 1));
    assert!(matches!(orphan, Err(Error::Driver { .. })));
    Ok(())
}
