//! # typeq
//!
//! Typed, composable queries over SQL, with schema migration planning.
//!
//! Tables are described by an [`Entity`] type, a column view implementing
//! [`TableColumns`] and [`ResultMapper`], and a [`TableDescriptor`]. Register
//! the entities once, then build [`TypedQuery`] values that lower to a single
//! SQL statement when a terminal runs:
//!
//! ```rust,ignore
//! use typeq::prelude::*;
//!
//! let registry = Registry::builder()
//!     .register::<Company>()?
//!     .register::<Employee>()?
//!     .build()?;
//! let db = Database::new(registry, Sqlite::open_in_memory()?);
//!
//! let at_acme: Vec<Employee> = db
//!     .all::<Employee>()?
//!     .filter(|e, j| j.value(&e.company()).name().eq("Acme"))
//!     .to_list(&db)?;
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | root   | `typeq-core` | SQL fragments, expressions, registry, queries |
//! | [`types`] | `typeq-types` | Table, column and key descriptors, [`Dialect`] |
//! | [`migrations`] | `typeq-migrations` | Schema snapshots and migration plans |
//! | [`sqlite`] | `typeq-sqlite` | rusqlite executor (`rusqlite` feature) |

pub use typeq_core::{
    Database, Entity, Error, Executor, Expr, FieldId, FieldRef, ForeignKey, ForeignKeyField,
    ForeignKeyLookup, FromValue, IntoExpr, JoinResolver, KeyValues, Operation, Pair, QueryIter,
    RegisteredTable, Registry, RegistryBuilder, Result, ResultMapper, Reverse, Row, SQL,
    SQLChunk, Single, SortOrder, Source, TableColumns, ToSQL, ToValue, Token, TypedQuery, Value,
    literal, lookup,
};

/// Typed expressions and operators: `eq`, `and`, `not`, `count`, `sum`, ...
pub use typeq_core::expr;

/// Database dialect enum
pub use typeq_types::Dialect;

/// Descriptor types consumed by the registry and the migration planner.
pub use typeq_types as types;

pub use typeq_types::{
    ColumnDescriptor, ColumnType, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor,
};

/// Schema snapshots, diff planning and DDL rendering.
#[cfg(feature = "std")]
pub use typeq_migrations as migrations;

/// rusqlite-backed executor.
#[cfg(feature = "rusqlite")]
pub mod sqlite {
    pub use typeq_sqlite::{Sqlite, SqliteParam};

    pub use rusqlite;
}

/// Everything needed to declare entities and write queries.
///
/// ```
/// use typeq::prelude::*;
///
/// let sql = literal(1_i64).eq(2_i64);
/// assert_eq!(sql.as_sql().sql(), "? = ?");
/// ```
pub mod prelude {
    pub use typeq_core::expr::{
        Numeric, Textual, and, count, count_all, eq, ge, gt, in_list, is_not_null, is_null, le,
        like, lt, max, min, ne, not, or, sum,
    };
    pub use typeq_core::{
        Database, Entity, Executor, Expr, FieldRef, ForeignKey, ForeignKeyField, ForeignKeyLookup,
        FromValue, IntoExpr, JoinResolver, KeyValues, ResultMapper, Reverse, Row, SQL, SortOrder,
        Source, TableColumns, ToValue, TypedQuery, Value, literal, lookup,
    };
    pub use typeq_core::{Registry, RegistryBuilder};
    pub use typeq_types::{
        ColumnDescriptor, ColumnType, Dialect, ForeignKeyDescriptor, IndexDescriptor,
        TableDescriptor,
    };

    #[cfg(feature = "rusqlite")]
    pub use crate::sqlite::Sqlite;
}
