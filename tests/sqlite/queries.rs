use typeq::prelude::*;
use typeq::{Error, Result};

use crate::common::schema::{Company, Employee};
use crate::common::{names, seeded_db, setup_db};

#[test]
fn filter_and_sort() -> Result<()> {
    let db = seeded_db();

    let well_paid = db
        .all::<Employee>()?
        .filter(|e, _| e.salary().ge(80))
        .sorted_by(|e, _| e.salary())
        .to_list(&db)?;
    assert_eq!(names(&well_paid), ["Bob", "Alice", "Carol"]);

    let descending = db
        .all::<Employee>()?
        .sorted_by_descending(|e, _| e.salary())
        .to_list(&db)?;
    assert_eq!(names(&descending), ["Carol", "Alice", "Bob", "Dan", "Dave"]);
    Ok(())
}

#[test]
fn chained_filters_are_conjunctive() -> Result<()> {
    let db = seeded_db();

    let chained = db
        .all::<Employee>()?
        .filter(|e, _| e.salary().gt(60))
        .filter(|e, _| e.name().starts_with("D"))
        .to_list(&db)?;
    let combined = db
        .all::<Employee>()?
        .filter(|e, _| e.salary().gt(60).and(e.name().starts_with("D")))
        .to_list(&db)?;

    assert_eq!(names(&chained), ["Dan"]);
    assert_eq!(chained, combined);
    Ok(())
}

#[test]
fn null_checks_on_nullable_columns() -> Result<()> {
    let db = seeded_db();

    let top = db
        .all::<Employee>()?
        .filter(|e, _| e.manager_id().is_null())
        .sorted_by(|e, _| e.id())
        .to_list(&db)?;
    assert_eq!(names(&top), ["Alice", "Carol"]);

    let reporting_to_alice = db
        .all::<Employee>()?
        .filter(|e, _| e.manager_id().eq(1_i64))
        .count(&db)?;
    assert_eq!(reporting_to_alice, 2);
    Ok(())
}

#[test]
fn in_list_and_negation() -> Result<()> {
    let db = seeded_db();

    let picked = db
        .all::<Employee>()?
        .filter(|e, _| e.name().in_list(["Bob", "Dan"]))
        .sorted_by(|e, _| e.id())
        .to_list(&db)?;
    assert_eq!(names(&picked), ["Bob", "Dan"]);

    let rest = db
        .all::<Employee>()?
        .filter(|e, _| not(e.name().in_list(["Bob", "Dan"])))
        .count(&db)?;
    assert_eq!(rest, 3);
    Ok(())
}

#[test]
fn reversed_is_an_involution() -> Result<()> {
    let db = seeded_db();
    let by_salary = db.all::<Employee>()?.sorted_by(|e, _| e.salary());

    let forward = by_salary.to_list(&db)?;
    let backward = by_salary.reversed().to_list(&db)?;
    let twice = by_salary.reversed().reversed().to_list(&db)?;

    assert_eq!(names(&forward), ["Dave", "Dan", "Bob", "Alice", "Carol"]);
    let mut flipped = backward.clone();
    flipped.reverse();
    assert_eq!(flipped, forward);
    assert_eq!(twice, forward);
    Ok(())
}

#[test]
fn take_and_drop_accumulate() -> Result<()> {
    let db = seeded_db();
    let by_id = db.all::<Employee>()?.sorted_by(|e, _| e.id());

    let taken = by_id.take(2).take(1);
    assert_eq!(taken.limit(), Some(3));
    assert_eq!(names(&taken.to_list(&db)?), ["Alice", "Bob", "Carol"]);

    let dropped = by_id.drop(1).drop(2);
    assert_eq!(dropped.offset(), Some(3));
    assert_eq!(names(&dropped.to_list(&db)?), ["Dan", "Dave"]);

    let page = by_id.drop(1).take(2);
    assert_eq!(names(&page.to_list(&db)?), ["Bob", "Carol"]);
    Ok(())
}

#[test]
fn take_and_drop_saturate() -> Result<()> {
    let db = seeded_db();
    let by_id = db.all::<Employee>()?.sorted_by(|e, _| e.id());

    let unbounded = by_id.take(u64::MAX).take(1);
    assert_eq!(unbounded.limit(), Some(u64::MAX));
    assert_eq!(unbounded.count(&db)?, 5);

    let past_end = by_id.drop(u64::MAX).drop(1);
    assert_eq!(past_end.offset(), Some(u64::MAX));
    assert!(past_end.to_list(&db)?.is_empty());
    Ok(())
}

#[test]
fn projections() -> Result<()> {
    let db = seeded_db();

    let salaries = db
        .all::<Employee>()?
        .sorted_by(|e, _| e.id())
        .map_single(|e, _| e.salary())
        .to_list(&db)?;
    assert_eq!(salaries, [100, 80, 120, 70, 60]);

    let pairs = db
        .all::<Employee>()?
        .filter(|e, _| e.salary().gt(90))
        .sorted_by(|e, _| e.id())
        .map_pair(|e, _| (e.name(), e.salary()))
        .to_list(&db)?;
    assert_eq!(
        pairs,
        [("Alice".to_string(), 100), ("Carol".to_string(), 120)]
    );

    // operators after a projection see the projected columns
    let sorted = db
        .all::<Employee>()?
        .map_pair(|e, _| (e.name(), e.salary()))
        .sorted_by_descending(|p, _| p.second.clone())
        .map_single(|p, _| p.first.clone())
        .to_list(&db)?;
    assert_eq!(sorted, ["Carol", "Alice", "Bob", "Dan", "Dave"]);
    Ok(())
}

#[test]
fn first_last_and_single() -> Result<()> {
    let db = seeded_db();
    let by_id = db.all::<Employee>()?.sorted_by(|e, _| e.id());

    assert_eq!(by_id.first(&db)?.name, "Alice");
    assert_eq!(by_id.last(&db)?.name, "Dave");
    assert_eq!(by_id.last_or_null(&db)?.map(|e| e.id), Some(5));

    let carol = db.all::<Employee>()?.filter(|e, _| e.name().eq("Carol"));
    assert_eq!(carol.single(&db)?.salary, 120);
    assert_eq!(carol.single_or_null(&db)?.map(|e| e.id), Some(3));
    Ok(())
}

#[test]
fn single_enforces_cardinality() -> Result<()> {
    let db = seeded_db();
    let employees = db.all::<Employee>()?;

    assert!(matches!(employees.single(&db), Err(Error::Cardinality)));
    assert!(matches!(employees.single_or_null(&db), Err(Error::Cardinality)));

    let nobody = employees.filter(|e, _| e.salary().gt(1000));
    assert!(matches!(nobody.single(&db), Err(Error::NotFound)));
    assert!(nobody.single_or_null(&db)?.is_none());
    assert!(matches!(nobody.first(&db), Err(Error::NotFound)));

    // a limit of one makes the query single-valued
    let one = employees.sorted_by(|e, _| e.id()).take(1);
    assert_eq!(one.single(&db)?.name, "Alice");
    Ok(())
}

#[test]
fn iteration() -> Result<()> {
    let db = seeded_db();
    let by_id = db.all::<Employee>()?.sorted_by(|e, _| e.id());

    let iter = by_id.iter(&db)?;
    assert_eq!(iter.size_hint(), (5, Some(5)));
    let ids = iter.map(|e| e.map(|e| e.id)).collect::<Result<Vec<_>>>()?;
    assert_eq!(ids, [1, 2, 3, 4, 5]);

    let mut total = 0;
    by_id.for_each(&db, |e| total += e.salary)?;
    assert_eq!(total, 430);
    Ok(())
}

#[test]
fn predicates() -> Result<()> {
    let db = seeded_db();
    let employees = db.all::<Employee>()?;

    assert!(employees.any(&db, |e, _| e.name().eq("Dan"))?);
    assert!(!employees.any(&db, |e, _| e.name().eq("Eve"))?);
    assert!(employees.none(&db, |e, _| e.salary().lt(0))?);
    assert!(employees.all(&db, |e, _| e.salary().ge(60))?);
    assert!(!employees.all(&db, |e, _| e.salary().ge(70))?);
    assert!(employees.is_not_empty(&db)?);
    assert!(!employees.is_empty(&db)?);
    Ok(())
}

#[test]
fn all_is_none_of_the_negation() -> Result<()> {
    let db = seeded_db();
    let employees = db.all::<Employee>()?;

    for threshold in [0_i64, 60, 75, 120, 500] {
        let all = employees.all(&db, |e, _| e.salary().ge(threshold))?;
        let none_negated = employees.none(&db, |e, _| not(e.salary().ge(threshold)))?;
        assert_eq!(all, none_negated, "threshold {threshold}");

        // a filter and its negation partition the rows
        let matching = employees.filter(|e, _| e.salary().ge(threshold)).count(&db)?;
        let rest = employees
            .filter(|e, _| not(e.salary().ge(threshold)))
            .count(&db)?;
        assert_eq!(matching + rest, 5);
    }
    Ok(())
}

#[test]
fn min_and_max_by() -> Result<()> {
    let db = seeded_db();
    let employees = db.all::<Employee>()?;

    let lowest = employees.min_by_or_null(&db, |e, _| e.salary())?;
    let highest = employees.max_by_or_null(&db, |e, _| e.salary())?;
    assert_eq!(lowest.map(|e| e.name), Some("Dave".to_string()));
    assert_eq!(highest.map(|e| e.name), Some("Carol".to_string()));
    Ok(())
}

#[test]
fn acme_scenario() -> Result<()> {
    let db = setup_db();
    db.insert(&Company::new("Acme"))?;
    db.insert(&Employee::new("Dan", 1, None, 50))?;

    let at_acme = db
        .all::<Employee>()?
        .filter(|e, j| j.value(&e.company()).name().eq("Acme"))
        .to_list(&db)?;
    assert_eq!(
        at_acme,
        [Employee {
            id: 1,
            ..Employee::new("Dan", 1, None, 50)
        }]
    );

    let companies = db
        .all::<Employee>()?
        .map_fk(|e, _| e.company())
        .to_list(&db)?;
    assert_eq!(
        companies,
        [Company {
            id: 1,
            name: "Acme".to_string()
        }]
    );
    Ok(())
}
