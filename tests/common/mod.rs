pub mod schema;

use std::cell::Cell;

use typeq::migrations::{VirtualSchema, apply_plan, plan};
use typeq::prelude::*;
use typeq::sqlite::rusqlite;

use schema::{Company, ContractsFor, Employee, Invoice};

pub fn registry() -> Registry {
    Registry::builder()
        .register::<Company>()
        .unwrap()
        .register::<Employee>()
        .unwrap()
        .register::<ContractsFor>()
        .unwrap()
        .register::<Invoice>()
        .unwrap()
        .build()
        .unwrap()
}

/// In-memory database with every registered table created by a migration plan.
pub fn setup_db() -> Database<Sqlite> {
    let sqlite = Sqlite::open_in_memory().unwrap();
    sqlite
        .connection()
        .execute_batch("PRAGMA foreign_keys = ON")
        .unwrap();
    let db = Database::new(registry(), sqlite);

    let empty = VirtualSchema::new("main");
    let target = VirtualSchema::from_registry("main", db.registry());
    let bootstrap = plan(&empty, &target).unwrap();
    apply_plan(&db, &bootstrap, &empty, Dialect::SQLite).unwrap();
    db
}

/// Companies, ids in insertion order
pub const COMPANIES: [&str; 3] = ["Acme", "Globex", "Initech"];

/// `setup_db` plus a small org chart:
///
/// | id | name  | company | manager | salary |
/// |----|-------|---------|---------|--------|
/// | 1  | Alice | Acme    |         | 100    |
/// | 2  | Bob   | Acme    | Alice   | 80     |
/// | 3  | Carol | Globex  |         | 120    |
/// | 4  | Dan   | Globex  | Carol   | 70     |
/// | 5  | Dave  | Acme    | Alice   | 60     |
///
/// Initech has nobody. Dan holds contracts with both Globex and Acme.
pub fn seeded_db() -> Database<Sqlite> {
    let db = setup_db();

    let companies: Vec<Company> = COMPANIES.iter().map(|name| Company::new(name)).collect();
    db.insert_all(&companies).unwrap();

    db.insert_all(&[
        Employee::new("Alice", 1, None, 100),
        Employee::new("Bob", 1, Some(1), 80),
        Employee::new("Carol", 2, None, 120),
        Employee::new("Dan", 2, Some(3), 70),
        Employee::new("Dave", 1, Some(1), 60),
    ])
    .unwrap();

    db.insert_all(&[
        ContractsFor::new(1, 1, "full-time"),
        ContractsFor::new(2, 1, "full-time"),
        ContractsFor::new(3, 2, "full-time"),
        ContractsFor::new(4, 2, "contractor"),
        ContractsFor::new(4, 1, "contractor"),
    ])
    .unwrap();

    db.insert_all(&[
        Invoice::new(4, 2, 500),
        Invoice::new(4, 2, 250),
        Invoice::new(4, 1, 300),
        Invoice::new(3, 2, 1000),
    ])
    .unwrap();

    db
}

/// Executor that counts the queries it runs.
#[derive(Debug)]
pub struct Counting {
    inner: Sqlite,
    queries: Cell<usize>,
}

impl Counting {
    pub fn wrap(db: Database<Sqlite>) -> Database<Counting> {
        let registry = db.registry().clone();
        let inner = db.into_inner();
        Database::new(
            registry,
            Counting {
                inner,
                queries: Cell::new(0),
            },
        )
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl Executor for Counting {
    type Error = rusqlite::Error;

    fn fetch(&self, sql: &SQL) -> Result<Vec<Vec<Value>>, Self::Error> {
        self.queries.set(self.queries.get() + 1);
        self.inner.fetch(sql)
    }

    fn execute(&self, sql: &SQL) -> Result<usize, Self::Error> {
        self.inner.execute(sql)
    }
}

pub fn names(employees: &[Employee]) -> Vec<&str> {
    employees.iter().map(|e| e.name.as_str()).collect()
}
