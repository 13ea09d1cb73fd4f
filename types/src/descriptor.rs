//! Table, column, foreign key and index descriptors

use core::any::TypeId;

use crate::{ColumnType, DescriptorError};

/// A single declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub auto_increment: bool,
    /// Whether the column carries its own single-column index
    pub indexed: bool,
    /// SQL default expression, kept as text
    pub default: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            auto_increment: false,
            indexed: false,
            default: None,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    #[must_use]
    pub fn default_sql(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(expression.into());
        self
    }
}

/// A named group of columns identifying a row of another table.
///
/// The target is identified by its entity type. Column count and order must match
/// the target primary key, which the registry checks when it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDescriptor {
    pub name: String,
    pub columns: Vec<String>,
    pub target: TypeId,
    pub target_name: &'static str,
    /// Name of the reverse reference on the target side, if one is generated
    pub reverse: Option<String>,
}

impl ForeignKeyDescriptor {
    pub fn new<T: 'static>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            target: TypeId::of::<T>(),
            target_name: core::any::type_name::<T>(),
            reverse: None,
        }
    }

    #[must_use]
    pub fn with_reverse(mut self, name: impl Into<String>) -> Self {
        self.reverse = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDescriptor {
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Static description of one table.
///
/// ```
/// use typeq_types::{ColumnDescriptor, ColumnType, TableDescriptor};
///
/// let company = TableDescriptor::new("company")
///     .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).auto_increment())
///     .with_column(ColumnDescriptor::new("name", ColumnType::Text))
///     .with_primary_key(["id"]);
///
/// assert!(company.validate().is_ok());
/// assert_eq!(company.column_index("name"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub schema: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    pub indices: Vec<IndexDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn with_primary_key(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyDescriptor) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indices.push(index);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key.iter().any(|c| c == column)
    }

    /// Whether `column` backs one of the declared foreign keys
    pub fn is_foreign_key(&self, column: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.columns.iter().any(|c| c == column))
    }

    /// Primary key column descriptors in key order
    pub fn primary_key_columns(&self) -> impl Iterator<Item = Option<&ColumnDescriptor>> {
        self.primary_key.iter().map(|name| self.column(name))
    }

    /// `schema.name` or `name`
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(DescriptorError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
            if let Some(reason) = column.column_type.unsupported_reason() {
                return Err(DescriptorError::UnsupportedType {
                    table: self.name.clone(),
                    column: column.name.clone(),
                    reason,
                });
            }
            if column.auto_increment && !column.column_type.is_integer() {
                return Err(DescriptorError::UnsupportedType {
                    table: self.name.clone(),
                    column: column.name.clone(),
                    reason: "only integer columns can auto-increment",
                });
            }
        }

        if self.primary_key.is_empty() {
            return Err(DescriptorError::EmptyPrimaryKey {
                table: self.name.clone(),
            });
        }

        let referenced = self
            .primary_key
            .iter()
            .chain(self.foreign_keys.iter().flat_map(|fk| fk.columns.iter()))
            .chain(self.indices.iter().flat_map(|index| index.columns.iter()));
        for name in referenced {
            if self.column(name).is_none() {
                return Err(DescriptorError::UnknownColumn {
                    table: self.name.clone(),
                    column: name.clone(),
                });
            }
        }
        Ok(())
    }
}
