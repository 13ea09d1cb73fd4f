//! In-memory schema snapshots used for diffing

use serde::{Deserialize, Serialize};
use typeq_core::Registry;
use typeq_types::{ColumnType, TableDescriptor};

use crate::collection::{Collection, Named};
use crate::error::Result;

/// The column a foreign-key column points at
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
}

/// Snapshot of one column
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VirtualColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// SQL default expression text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnReference>,
}

impl VirtualColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            auto_increment: false,
            default: None,
            references: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn default_sql(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(expression.into());
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ColumnReference {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}

impl Named for VirtualColumn {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Snapshot of one index
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VirtualIndex {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl VirtualIndex {
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl Named for VirtualIndex {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Snapshot of one table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VirtualTable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub columns: Collection<VirtualColumn>,
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub indices: Collection<VirtualIndex>,
}

impl VirtualTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Collection::new(),
            primary_key: Vec::new(),
            indices: Collection::new(),
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a column; a column whose name is already taken is ignored.
    pub fn with_column(mut self, column: VirtualColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_index(mut self, index: VirtualIndex) -> Self {
        self.indices.push(index);
        self
    }

    /// Snapshot of a descriptor. `target_table` names the table behind each
    /// foreign key, by the key's position in `descriptor.foreign_keys`.
    pub fn from_descriptor<F>(descriptor: &TableDescriptor, target_table: F) -> Self
    where
        F: Fn(usize) -> Option<(String, Vec<String>)>,
    {
        let mut table = Self::new(descriptor.name.clone()).with_primary_key(descriptor.primary_key.clone());
        table.schema = descriptor.schema.clone();

        for column in &descriptor.columns {
            let references = descriptor
                .foreign_keys
                .iter()
                .enumerate()
                .find_map(|(i, fk)| {
                    let position = fk.columns.iter().position(|c| *c == column.name)?;
                    let (target, key) = target_table(i)?;
                    Some(ColumnReference {
                        table: target,
                        column: key.get(position)?.clone(),
                    })
                });
            table.columns.push(VirtualColumn {
                name: column.name.clone(),
                column_type: column.column_type.clone(),
                nullable: column.nullable,
                auto_increment: column.auto_increment,
                default: column.default.clone(),
                references,
            });
            if column.indexed {
                table.indices.push(VirtualIndex::new(
                    format!("{}_{}", descriptor.name, column.name),
                    [column.name.clone()],
                ));
            }
        }

        for index in &descriptor.indices {
            table.indices.push(VirtualIndex {
                name: index.name.clone(),
                columns: index.columns.clone(),
                unique: index.unique,
            });
        }
        table
    }

    /// Names of the tables this table's columns reference, excluding itself
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter_map(|column| column.references.as_ref())
            .map(|reference| reference.table.as_str())
            .filter(move |table| *table != self.name)
    }
}

impl Named for VirtualTable {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named set of table snapshots, not bound to any connection
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct VirtualSchema {
    pub name: String,
    pub tables: Collection<VirtualTable>,
}

impl VirtualSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Collection::new(),
        }
    }

    pub fn with_table(mut self, table: VirtualTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&VirtualTable> {
        self.tables.get(name)
    }

    /// Snapshot of every table in `registry`
    pub fn from_registry(name: impl Into<String>, registry: &Registry) -> Self {
        let mut schema = Self::new(name);
        for registered in registry.tables() {
            let descriptor = &registered.descriptor;
            let table = VirtualTable::from_descriptor(descriptor, |i| {
                let fk = descriptor.foreign_keys.get(i)?;
                let target = registry.tables().find(|t| t.type_id == fk.target)?;
                Some((
                    target.descriptor.name.clone(),
                    target.descriptor.primary_key.clone(),
                ))
            });
            schema.tables.push(table);
        }
        schema
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
