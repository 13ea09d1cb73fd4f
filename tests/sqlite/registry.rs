use typeq::prelude::*;
use typeq::{Error, Result};

use crate::common::registry;
use crate::common::schema::{Company, ContractsFor, Employee, Invoice};

#[test]
fn duplicate_registration_is_rejected() {
    let result = Registry::builder()
        .register::<Company>()
        .and_then(|builder| builder.register::<Company>());
    assert!(matches!(result, Err(Error::DuplicateRegistration(_))));
}

#[test]
fn unregistered_target_is_rejected() {
    let result = Registry::builder()
        .register::<Company>()
        .and_then(|builder| builder.register::<Employee>())
        .and_then(|builder| builder.register::<Invoice>())
        .and_then(|builder| builder.build());
    assert!(matches!(
        result,
        Err(Error::ForeignKeyMismatch { table, .. }) if table == "invoice"
    ));
}

#[test]
fn unregistered_entity_has_no_query() {
    let registry = Registry::builder()
        .register::<Company>()
        .and_then(|builder| builder.build())
        .unwrap();

    assert!(registry.is_registered::<Company>());
    assert!(!registry.is_registered::<Employee>());
    assert!(matches!(
        registry.all::<Employee>(),
        Err(Error::NotRegistered(_))
    ));
}

#[test]
fn tables_in_registration_order() -> Result<()> {
    let registry = registry();

    let names: Vec<&str> = registry
        .tables()
        .map(|t| t.descriptor.name.as_str())
        .collect();
    assert_eq!(names, ["company", "employee", "contracts_for", "invoice"]);

    let contracts = registry.table::<ContractsFor>()?;
    assert_eq!(contracts.descriptor.primary_key, ["employee_id", "company_id"]);
    assert!(registry.table_named("invoice").is_some());
    assert!(registry.table_named("payroll").is_none());
    Ok(())
}
