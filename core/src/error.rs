use std::fmt;

use thiserror::Error;
use typeq_types::DescriptorError;

/// The operation a driver error surfaced from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Evaluating a typed query
    Query,
    /// Resolving a foreign-key cell on first access
    LazyResolve,
    /// Insert or update of an entity
    Modify,
    /// Executing a raw statement
    Execute,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Query => "query",
            Operation::LazyResolve => "foreign key resolution",
            Operation::Modify => "modification",
            Operation::Execute => "statement execution",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// An entity type or table name was registered twice
    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// The entity was never registered
    #[error("Entity `{0}` is not registered")]
    NotRegistered(&'static str),

    /// A descriptor failed validation
    #[error(transparent)]
    InvalidDescriptor(#[from] DescriptorError),

    /// A foreign key does not line up with the primary key it targets
    #[error("Foreign key `{table}.{field}`: {reason}")]
    ForeignKeyMismatch {
        table: String,
        field: String,
        reason: String,
    },

    /// No rows returned when at least one was expected
    #[error("No rows found")]
    NotFound,

    /// More than one row returned when at most one was expected
    #[error("Expected a single row, found more than one")]
    Cardinality,

    /// The query's mapper exposes no foreign-key cell for the prefetched field
    #[error("Foreign key field `{0}` cannot be prefetched by this query")]
    PrefetchUnavailable(String),

    /// Error mapping data
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Error reported by the database driver
    #[error("Database error during {operation}: {source}")]
    Driver {
        operation: Operation,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn driver<E>(operation: Operation, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Driver {
            operation,
            source: Box::new(source),
        }
    }
}

/// Result type for typeq operations
pub type Result<T> = std::result::Result<T, Error>;
