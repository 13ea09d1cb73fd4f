//! Table registry: the process-wide catalogue of entity descriptors.

use std::any::{TypeId, type_name};
use std::sync::Arc;

use hashbrown::HashMap;
use typeq_types::{ForeignKeyDescriptor, TableDescriptor};

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::query::TypedQuery;

/// A registered entity and its descriptor.
#[derive(Debug, Clone)]
pub struct RegisteredTable {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub descriptor: TableDescriptor,
}

#[derive(Debug, Default)]
struct Tables {
    entries: Vec<RegisteredTable>,
    by_type: HashMap<TypeId, usize>,
    by_name: HashMap<String, usize>,
}

impl Tables {
    fn get(&self, type_id: &TypeId) -> Option<&RegisteredTable> {
        self.by_type.get(type_id).map(|&idx| &self.entries[idx])
    }
}

/// Collects entities before the registry is frozen.
///
/// ```ignore
/// let registry = Registry::builder()
///     .register::<Company>()?
///     .register::<Employee>()?
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    tables: Tables,
}

impl RegistryBuilder {
    /// Add `E`. Registering the same entity or table name twice fails.
    pub fn register<E: Entity>(mut self) -> Result<Self> {
        let type_id = TypeId::of::<E>();
        if self.tables.by_type.contains_key(&type_id) {
            return Err(Error::DuplicateRegistration(type_name::<E>().to_string()));
        }
        let descriptor = E::descriptor();
        let name = descriptor.qualified_name();
        if self.tables.by_name.contains_key(&name) {
            return Err(Error::DuplicateRegistration(name));
        }

        let idx = self.tables.entries.len();
        self.tables.by_type.insert(type_id, idx);
        self.tables.by_name.insert(name, idx);
        self.tables.entries.push(RegisteredTable {
            type_id,
            type_name: type_name::<E>(),
            descriptor,
        });
        Ok(self)
    }

    /// Validate every descriptor and foreign key, then freeze.
    pub fn build(self) -> Result<Registry> {
        for table in &self.tables.entries {
            table.descriptor.validate()?;
        }
        for table in &self.tables.entries {
            for fk in &table.descriptor.foreign_keys {
                check_foreign_key(&self.tables, &table.descriptor, fk)?;
            }
        }
        Ok(Registry {
            tables: Arc::new(self.tables),
        })
    }
}

fn check_foreign_key(
    tables: &Tables,
    owner: &TableDescriptor,
    fk: &ForeignKeyDescriptor,
) -> Result<()> {
    let mismatch = |reason: String| Error::ForeignKeyMismatch {
        table: owner.name.clone(),
        field: fk.name.clone(),
        reason,
    };

    let target = tables
        .get(&fk.target)
        .ok_or_else(|| mismatch(format!("target `{}` is not registered", fk.target_name)))?;
    let target = &target.descriptor;

    if fk.columns.len() != target.primary_key.len() {
        return Err(mismatch(format!(
            "{} column(s) cannot reference the {}-column key of `{}`",
            fk.columns.len(),
            target.primary_key.len(),
            target.name
        )));
    }

    let mut nullable = None;
    for (column, key) in fk.columns.iter().zip(&target.primary_key) {
        let (Some(column), Some(key)) = (owner.column(column), target.column(key)) else {
            return Err(mismatch(format!("column `{column}` is not declared")));
        };
        if column.column_type != key.column_type {
            return Err(mismatch(format!(
                "`{}` has type {:?} but `{}.{}` has type {:?}",
                column.name, column.column_type, target.name, key.name, key.column_type
            )));
        }
        match nullable {
            None => nullable = Some(column.nullable),
            Some(previous) if previous != column.nullable => {
                return Err(mismatch("columns mix nullable and non-null".to_string()));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Frozen, shareable set of registered tables.
#[derive(Debug, Clone)]
pub struct Registry {
    tables: Arc<Tables>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn is_registered<E: Entity>(&self) -> bool {
        self.tables.by_type.contains_key(&TypeId::of::<E>())
    }

    pub fn table<E: Entity>(&self) -> Result<&RegisteredTable> {
        self.tables
            .get(&TypeId::of::<E>())
            .ok_or(Error::NotRegistered(type_name::<E>()))
    }

    /// Lookup by qualified table name
    pub fn table_named(&self, name: &str) -> Option<&RegisteredTable> {
        self.tables
            .by_name
            .get(name)
            .map(|&idx| &self.tables.entries[idx])
    }

    /// Registered tables in registration order
    pub fn tables(&self) -> impl Iterator<Item = &RegisteredTable> {
        self.tables.entries.iter()
    }

    /// Every row of `E`: all declared columns, no condition, no joins.
    pub fn all<E: Entity>(&self) -> Result<TypedQuery<E::Columns, E>> {
        self.table::<E>()?;
        Ok(TypedQuery::from_table())
    }
}
