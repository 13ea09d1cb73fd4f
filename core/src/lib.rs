//! Core of typeq: typed SQL fragments, the entity contract, the registry and
//! the [`TypedQuery`] engine.

pub mod database;
pub mod entity;
pub mod error;
pub mod expr;
pub mod foreign_key;
pub mod join;
pub mod mapper;
pub mod order;
pub mod query;
pub mod registry;
pub mod row;
pub mod sql;
mod trace;
pub mod value;

// Re-export key types and traits
pub use database::{Database, Executor};
pub use entity::{Entity, FieldId, FieldRef, KeyValues, Source, TableColumns};
pub use error::{Error, Operation, Result};
pub use expr::{Expr, IntoExpr, literal};
pub use foreign_key::{ForeignKey, ForeignKeyField, Reverse};
pub use join::JoinResolver;
pub use mapper::{ForeignKeyLookup, Pair, ResultMapper, Single, lookup};
pub use order::SortOrder;
pub use query::{QueryIter, TypedQuery};
pub use registry::{RegisteredTable, Registry, RegistryBuilder};
pub use row::Row;
pub use sql::{SQL, SQLChunk, ToSQL, Token};
pub use value::{FromValue, ToValue, Value};
