use thiserror::Error;

/// Errors raised while validating a [`TableDescriptor`](crate::TableDescriptor)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Every table needs at least one primary key column
    #[error("table `{table}` declares no primary key")]
    EmptyPrimaryKey { table: String },

    /// A primary key, foreign key or index names a column the table does not have
    #[error("table `{table}` references unknown column `{column}`")]
    UnknownColumn { table: String, column: String },

    /// Two columns share a name
    #[error("table `{table}` declares column `{column}` twice")]
    DuplicateColumn { table: String, column: String },

    /// The column type parameters cannot be mapped to SQL
    #[error("column `{table}.{column}` has an unsupported type: {reason}")]
    UnsupportedType {
        table: String,
        column: String,
        reason: &'static str,
    },
}
