use typeq::Result;
use typeq::prelude::*;

use crate::common::schema::{Company, Employee, Invoice};
use crate::common::setup_db;

#[test]
fn base_query_selects_declared_columns() -> Result<()> {
    let db = setup_db();

    let sql = db.all::<Company>()?.to_sql();
    assert_eq!(
        sql.sql(),
        r#"SELECT "company"."id", "company"."name" FROM "company""#
    );
    Ok(())
}

#[test]
fn foreign_key_filter_joins_with_alias() -> Result<()> {
    let db = setup_db();

    let sql = db
        .all::<Employee>()?
        .filter(|e, j| j.value(&e.company()).name().eq("Acme"))
        .to_sql();
    let text = sql.sql();

    assert!(text.contains(
        r#"FROM "employee" LEFT JOIN "company" AS "joined_a" ON "joined_a"."id" = "employee"."company_id""#
    ));
    assert!(text.ends_with(r#"WHERE "joined_a"."name" = ?"#));
    assert_eq!(sql.params().collect::<Vec<_>>(), [&Value::from("Acme")]);
    Ok(())
}

#[test]
fn composite_join_matches_every_key_column() -> Result<()> {
    let db = setup_db();

    let text = db
        .all::<Invoice>()?
        .filter(|i, j| j.value(&i.contract()).role().eq("contractor"))
        .to_sql()
        .sql();
    assert!(text.contains(
        r#"LEFT JOIN "contracts_for" AS "joined_a" ON "joined_a"."employee_id" = "invoice"."contract_employee" AND "joined_a"."company_id" = "invoice"."contract_company""#
    ));
    Ok(())
}

#[test]
fn ordering_and_pagination() -> Result<()> {
    let db = setup_db();
    let by_salary = db.all::<Employee>()?.sorted_by(|e, _| e.salary());

    let text = by_salary.take(3).drop(1).to_sql().sql();
    assert!(text.ends_with(r#"ORDER BY "employee"."salary" ASC NULLS LAST LIMIT 3 OFFSET 1"#));

    let reversed = by_salary.reversed().to_sql().sql();
    assert!(reversed.ends_with(r#"ORDER BY "employee"."salary" DESC NULLS FIRST"#));

    let descending = db
        .all::<Employee>()?
        .sorted_by_descending(|e, _| e.salary())
        .to_sql()
        .sql();
    assert!(descending.ends_with(r#""employee"."salary" DESC NULLS LAST"#));
    Ok(())
}

#[test]
fn offset_without_limit() -> Result<()> {
    let db = setup_db();

    let text = db.all::<Company>()?.drop(2).to_sql().sql();
    assert!(text.ends_with("LIMIT -1 OFFSET 2"));
    Ok(())
}

#[test]
fn reverse_count_groups_by_primary_key() -> Result<()> {
    let db = setup_db();

    let text = db
        .all::<Company>()?
        .map_pair(|c, j| (c.name(), j.count(&c.employees())))
        .to_sql()
        .sql();
    assert_eq!(
        text,
        r#"SELECT "company"."name", COUNT("joined_a"."id") FROM "company" LEFT JOIN "employee" AS "joined_a" ON "company"."id" = "joined_a"."company_id" GROUP BY "company"."id""#
    );
    Ok(())
}

#[test]
fn repeated_selections_are_selected_once() -> Result<()> {
    let db = setup_db();

    let text = db
        .all::<Employee>()?
        .map_pair(|e, _| (e.name(), e.name()))
        .to_sql()
        .sql();
    assert_eq!(text, r#"SELECT "employee"."name" FROM "employee""#);
    Ok(())
}

#[test]
fn prefetch_selects_the_target_columns() -> Result<()> {
    let db = setup_db();

    let text = db
        .all::<Employee>()?
        .prefetch(|e, _| e.company())?
        .to_sql()
        .sql();
    assert!(text.starts_with(
        r#"SELECT "employee"."id", "employee"."name", "employee"."company_id", "employee"."manager_id", "employee"."salary", "joined_a"."id", "joined_a"."name" FROM"#
    ));
    Ok(())
}
