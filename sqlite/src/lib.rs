//! SQLite driver for typeq
//!
//! Runs lowered typeq SQL on a [`rusqlite`] connection.

pub mod values;

#[cfg(feature = "rusqlite")]
pub mod connection;

#[cfg(feature = "rusqlite")]
pub use connection::Sqlite;
pub use values::SqliteParam;
