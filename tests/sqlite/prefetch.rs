use typeq::prelude::*;
use typeq::{Error, Result};

use crate::common::schema::{Company, ContractsFor, Employee, Invoice};
use crate::common::{Counting, seeded_db};

#[test]
fn lazy_resolution_queries_once_per_cell() -> Result<()> {
    let db = Counting::wrap(seeded_db());

    let employees = db.all::<Employee>()?.sorted_by(|e, _| e.id()).to_list(&db)?;
    assert_eq!(db.executor().queries(), 1);

    let first = &employees[0];
    assert!(!first.company.is_resolved());
    assert_eq!(first.company.value(&db)?.name, "Acme");
    assert_eq!(first.company.value(&db)?.name, "Acme");
    assert!(first.company.is_resolved());
    assert_eq!(db.executor().queries(), 2);
    Ok(())
}

#[test]
fn prefetch_matches_lazy_resolution() -> Result<()> {
    let db = Counting::wrap(seeded_db());
    let by_id = db.all::<Employee>()?.sorted_by(|e, _| e.id());

    let lazy = by_id.to_list(&db)?;
    let before = db.executor().queries();
    let lazy_companies = lazy
        .iter()
        .map(|e| e.company.value(&db).cloned())
        .collect::<Result<Vec<Company>>>()?;
    assert_eq!(db.executor().queries() - before, lazy.len());

    let prefetched = by_id.prefetch(|e, _| e.company())?.to_list(&db)?;
    let before = db.executor().queries();
    let prefetched_companies = prefetched
        .iter()
        .map(|e| e.company.value(&db).cloned())
        .collect::<Result<Vec<Company>>>()?;
    assert_eq!(db.executor().queries(), before);

    assert_eq!(prefetched, lazy);
    assert_eq!(prefetched_companies, lazy_companies);
    Ok(())
}

#[test]
fn prefetch_leaves_null_references_alone() -> Result<()> {
    let db = Counting::wrap(seeded_db());

    let employees = db
        .all::<Employee>()?
        .sorted_by(|e, _| e.id())
        .prefetch(|e, _| e.manager())?
        .to_list(&db)?;
    let before = db.executor().queries();

    let managers: Vec<Option<&str>> = employees
        .iter()
        .map(|e| {
            e.manager
                .as_ref()
                .map(|m| m.cached().map(|m| m.name.as_str()).unwrap_or("?"))
        })
        .collect();
    assert_eq!(
        managers,
        [None, Some("Alice"), None, Some("Carol"), Some("Alice")]
    );
    assert_eq!(db.executor().queries(), before);
    Ok(())
}

#[test]
fn prefetch_through_a_prefetched_row() -> Result<()> {
    let db = Counting::wrap(seeded_db());

    let employees = db
        .all::<Employee>()?
        .filter(|e, _| e.name().eq("Dan"))
        .prefetch(|e, _| e.manager())?
        .prefetch(|e, j| j.value(&e.manager()).company())?;

    // the manager join is shared between both prefetches
    assert_eq!(employees.join_count(), 2);

    let dan = employees.single(&db)?;
    let before = db.executor().queries();
    let carol = dan.manager.as_ref().and_then(|m| m.cached());
    assert_eq!(carol.map(|c| c.name.as_str()), Some("Carol"));
    let globex = carol.and_then(|c| c.company.cached());
    assert_eq!(globex.map(|c| c.name.as_str()), Some("Globex"));
    assert_eq!(db.executor().queries(), before);
    Ok(())
}

#[test]
fn prefetch_composite_reference() -> Result<()> {
    let db = Counting::wrap(seeded_db());

    let invoices = db
        .all::<Invoice>()?
        .sorted_by(|i, _| i.id())
        .prefetch(|i, _| i.contract())?
        .prefetch(|i, j| j.value(&i.contract()).employee())?
        .to_list(&db)?;
    let before = db.executor().queries();

    let summary: Vec<(String, String, i64)> = invoices
        .iter()
        .map(|i| {
            let contract = i.contract.cached().map(ContractsFor::clone);
            let contract = contract.unwrap_or_else(|| ContractsFor::new(0, 0, "?"));
            let employee = contract
                .employee
                .cached()
                .map(|e| e.name.clone())
                .unwrap_or_default();
            (employee, contract.role, i.amount)
        })
        .collect();
    assert_eq!(db.executor().queries(), before);
    assert_eq!(
        summary,
        [
            ("Dan".to_string(), "contractor".to_string(), 500),
            ("Dan".to_string(), "contractor".to_string(), 250),
            ("Dan".to_string(), "contractor".to_string(), 300),
            ("Carol".to_string(), "full-time".to_string(), 1000),
        ]
    );

    // lazily resolved cells agree with the prefetched ones
    let lazy = db.all::<Invoice>()?.sorted_by(|i, _| i.id()).to_list(&db)?;
    for (lazy, prefetched) in lazy.iter().zip(&invoices) {
        assert_eq!(lazy.contract.value(&db)?, prefetched.contract.value(&db)?);
    }
    Ok(())
}

#[test]
fn prefetch_needs_a_cell_in_the_output() -> Result<()> {
    let db = seeded_db();

    // the manager's company is not reachable without prefetching the manager
    let result = db
        .all::<Employee>()?
        .prefetch(|e, j| j.value(&e.manager()).company());
    assert!(matches!(result, Err(Error::PrefetchUnavailable(_))));
    Ok(())
}

#[test]
fn resolved_cells_skip_the_lookup() -> Result<()> {
    let db = Counting::wrap(seeded_db());

    let acme = Company {
        id: 1,
        name: "Acme".to_string(),
    };
    let employee = Employee {
        company: ForeignKey::resolved(acme.clone()),
        ..Employee::new("Eve", 1, None, 10)
    };
    assert_eq!(employee.company.value(&db)?, &acme);
    assert_eq!(db.executor().queries(), 0);
    Ok(())
}

#[test]
fn missing_reference_is_not_found() -> Result<()> {
    let db = seeded_db();

    let dangling = ForeignKey::<Company>::new(42);
    assert!(matches!(dangling.value(&db), Err(Error::NotFound)));
    assert!(!dangling.is_resolved());
    Ok(())
}
