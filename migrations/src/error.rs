//! Migration errors

/// Errors raised while planning, applying or rendering migrations
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A column changed in a way no single statement can express
    #[error("Unsupported change to column `{table}.{column}`: {reason}")]
    UnsupportedColumnChange {
        table: String,
        column: String,
        reason: String,
    },

    /// A table changed in a way no statement can express
    #[error("Unsupported change to table `{table}`: {reason}")]
    UnsupportedTableChange { table: String, reason: String },

    /// A table's primary key columns changed
    #[error("Unsupported change to the primary key of `{0}`")]
    UnsupportedPrimaryKeyChange(String),

    #[error("Table `{0}` does not exist")]
    MissingTable(String),

    #[error("Table `{0}` already exists")]
    DuplicateTable(String),

    #[error("Column `{table}.{column}` does not exist")]
    MissingColumn { table: String, column: String },

    #[error("Column `{table}.{column}` already exists")]
    DuplicateColumn { table: String, column: String },

    #[error("Index `{index}` on `{table}` does not exist")]
    MissingIndex { table: String, index: String },

    #[error("Index `{index}` on `{table}` already exists")]
    DuplicateIndex { table: String, index: String },

    /// Applying a plan to its source did not reproduce its target
    #[error("Plan does not reproduce the target schema: {0}")]
    PlanMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A statement failed while being executed
    #[error(transparent)]
    Database(#[from] typeq_core::Error),
}

pub type Result<T> = std::result::Result<T, MigrationError>;
