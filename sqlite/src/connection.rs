//! rusqlite-backed [`Executor`].

use rusqlite::{Connection, params_from_iter};
use typeq_core::{Executor, SQL, Value};

use crate::values::{SqliteParam, from_value_ref};

/// A SQLite connection that runs lowered typeq SQL.
///
/// ```no_run
/// use typeq_sqlite::Sqlite;
///
/// let db = Sqlite::open_in_memory().unwrap();
/// db.connection().execute_batch("PRAGMA foreign_keys = ON").unwrap();
/// ```
#[derive(Debug)]
pub struct Sqlite {
    conn: Connection,
}

impl Sqlite {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Connection::open_in_memory().map(Self::new)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl From<Connection> for Sqlite {
    fn from(conn: Connection) -> Self {
        Self::new(conn)
    }
}

impl Executor for Sqlite {
    type Error = rusqlite::Error;

    fn fetch(&self, sql: &SQL) -> Result<Vec<Vec<Value>>, Self::Error> {
        let (text, params) = sql.build();
        let mut stmt = self.conn.prepare(&text)?;
        let width = stmt.column_count();

        let mut rows = stmt.query(params_from_iter(params.iter().copied().map(SqliteParam)))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_value_ref(row.get_ref(i)?));
            }
            results.push(values);
        }
        Ok(results)
    }

    fn execute(&self, sql: &SQL) -> Result<usize, Self::Error> {
        let (text, params) = sql.build();
        self.conn
            .execute(&text, params_from_iter(params.iter().copied().map(SqliteParam)))
    }
}
