use typeq::migrations::{
    Config, Statement, VirtualColumn, VirtualIndex, VirtualSchema, apply_plan, plan,
};
use typeq::prelude::*;

use crate::common::registry;
use crate::common::schema::Employee;
use crate::common::setup_db;

#[test]
fn registry_snapshot_carries_keys_and_references() {
    let schema = VirtualSchema::from_registry("main", &registry());

    let employee = schema.table("employee").unwrap();
    assert_eq!(employee.primary_key, ["id"]);
    let company_id = employee.columns.get("company_id").unwrap();
    assert_eq!(
        company_id.references.as_ref().map(|r| (r.table.as_str(), r.column.as_str())),
        Some(("company", "id"))
    );
    assert!(employee.indices.get("employee_company_id").is_some());

    let invoice = schema.table("invoice").unwrap();
    let columns: Vec<_> = ["contract_employee", "contract_company"]
        .iter()
        .map(|name| {
            let reference = invoice.columns.get(name).unwrap().references.clone().unwrap();
            (reference.table, reference.column)
        })
        .collect();
    assert_eq!(
        columns,
        [
            ("contracts_for".to_string(), "employee_id".to_string()),
            ("contracts_for".to_string(), "company_id".to_string()),
        ]
    );
}

#[test]
fn bootstrap_orders_tables_by_dependency() {
    let target = VirtualSchema::from_registry("main", &registry());
    let bootstrap = plan(&VirtualSchema::new("main"), &target).unwrap();

    let created: Vec<&str> = bootstrap
        .iter()
        .filter_map(|statement| match statement {
            Statement::CreateTable { table } => Some(table.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(created, ["company", "employee", "contracts_for", "invoice"]);

    let sql = bootstrap
        .render(&Config::default(), &VirtualSchema::new("main"))
        .unwrap();
    assert!(sql.contains(
        "CONSTRAINT `invoice_contract_employee_contract_company_contracts_for_fk` FOREIGN KEY (`contract_employee`, `contract_company`) REFERENCES `contracts_for`(`employee_id`, `company_id`)"
    ));
    assert!(sql.contains("\tPRIMARY KEY(`employee_id`, `company_id`)"));
}

#[test]
fn applied_plan_matches_target_and_reverses() {
    let db = setup_db();
    let current = VirtualSchema::from_registry("main", db.registry());

    let mut target = current.clone();
    let employees = target.tables.get_mut("employee").unwrap();
    employees
        .columns
        .push(VirtualColumn::new("title", ColumnType::Text).nullable());
    employees.indices.push(VirtualIndex::new("employee_salary", ["salary"]));

    let change = plan(&current, &target).unwrap();
    let mut snapshot = current.clone();
    change.apply(&mut snapshot).unwrap();
    assert_eq!(snapshot, target);

    change.reverse().apply(&mut snapshot).unwrap();
    assert_eq!(snapshot, current);

    // the same plan runs against the live tables without losing rows
    db.executor()
        .connection()
        .execute_batch(
            "INSERT INTO company (name) VALUES ('Acme');
             INSERT INTO employee (name, company_id, salary) VALUES ('Alice', 1, 100);",
        )
        .unwrap();
    apply_plan(&db, &change, &current, Dialect::SQLite).unwrap();
    assert_eq!(db.all::<Employee>().unwrap().count(&db).unwrap(), 1);

    apply_plan(&db, &change.reverse(), &target, Dialect::SQLite).unwrap();
    assert_eq!(db.find::<Employee>(&1).unwrap().name, "Alice");
}
