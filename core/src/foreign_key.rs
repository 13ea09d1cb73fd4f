//! Foreign-key cells, foreign-key fields and reverse references.

use std::any::Any;
use std::cell::OnceCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::database::{Database, Executor};
use crate::entity::{Entity, FieldId, FieldRef};
use crate::error::Result;
use crate::sql::SQL;

/// A reference to a row of `T`, holding the key and a one-shot cache.
///
/// The first [`value`](ForeignKey::value) call runs a point lookup by key and
/// caches the row. [`populate`](ForeignKey::populate) fills the cache without
/// querying and always overwrites it. The cell is not `Sync`; hand it to one
/// thread at a time.
pub struct ForeignKey<T: Entity> {
    key: T::Key,
    cache: OnceCell<Box<T>>,
}

impl<T: Entity> ForeignKey<T> {
    pub fn new(key: T::Key) -> Self {
        Self {
            key,
            cache: OnceCell::new(),
        }
    }

    /// A cell already holding `value`, keyed by `value.key()`.
    pub fn resolved(value: T) -> Self {
        Self {
            key: value.key(),
            cache: OnceCell::from(Box::new(value)),
        }
    }

    pub fn key(&self) -> &T::Key {
        &self.key
    }

    pub fn is_resolved(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn cached(&self) -> Option<&T> {
        self.cache.get().map(|boxed| &**boxed)
    }

    pub fn cached_mut(&mut self) -> Option<&mut T> {
        self.cache.get_mut().map(|boxed| &mut **boxed)
    }

    /// Store `value` as the referenced row, replacing any cached one.
    pub fn populate(&mut self, value: T) {
        self.cache = OnceCell::from(Box::new(value));
    }

    /// The referenced row, fetched by key on first access.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when no row has
    /// the key, and [`Error::Cardinality`](crate::Error::Cardinality) when
    /// several do.
    pub fn value<E: Executor>(&self, db: &Database<E>) -> Result<&T> {
        if let Some(cached) = self.cache.get() {
            return Ok(&**cached);
        }
        crate::typeq_trace_resolve!(std::any::type_name::<T>());
        let fetched = db.find::<T>(&self.key)?;
        Ok(&**self.cache.get_or_init(|| Box::new(fetched)))
    }

    /// Type-erased handle used by result mappers to reach this cell.
    pub fn slot(&mut self) -> &mut (dyn Any + 'static) {
        self
    }
}

impl<T: Entity + Clone> Clone for ForeignKey<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            cache: self.cache.clone(),
        }
    }
}

/// Two cells are equal when they reference the same key.
impl<T: Entity> PartialEq for ForeignKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T: Entity> fmt::Debug for ForeignKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignKey")
            .field("key", &self.key)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// A foreign-key field of one table occurrence, pointing at `T`.
///
/// Follow it with [`JoinResolver::value`](crate::JoinResolver::value) inside a
/// query operator to get the target's columns.
pub struct ForeignKeyField<T> {
    field: FieldRef,
    columns: Vec<SQL>,
    nullable: bool,
    _target: PhantomData<fn() -> T>,
}

impl<T> ForeignKeyField<T> {
    pub(crate) fn new(field: FieldRef, columns: Vec<SQL>, nullable: bool) -> Self {
        Self {
            field,
            columns,
            nullable,
            _target: PhantomData,
        }
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    /// Owner-side columns, qualified by the owner's table or alias
    pub fn columns(&self) -> &[SQL] {
        &self.columns
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl<T> Clone for ForeignKeyField<T> {
    fn clone(&self) -> Self {
        Self::new(self.field.clone(), self.columns.clone(), self.nullable)
    }
}

impl<T> fmt::Debug for ForeignKeyField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignKeyField")
            .field("field", &self.field)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// The one-to-many view of a foreign key: rows of `H` pointing at the owner.
pub struct Reverse<H> {
    owner: Arc<str>,
    key: Vec<SQL>,
    field: FieldId,
    fk_columns: Vec<&'static str>,
    _many: PhantomData<fn() -> H>,
}

impl<H> Reverse<H> {
    pub(crate) fn new(
        owner: Arc<str>,
        key: Vec<SQL>,
        field: FieldId,
        fk_columns: &[&'static str],
    ) -> Self {
        Self {
            owner,
            key,
            field,
            fk_columns: fk_columns.to_vec(),
            _many: PhantomData,
        }
    }

    pub(crate) fn field_ref(&self) -> FieldRef {
        FieldRef {
            qualifier: self.owner.clone(),
            id: self.field,
        }
    }

    /// Owner primary key columns
    pub(crate) fn key(&self) -> &[SQL] {
        &self.key
    }

    pub(crate) fn fk_columns(&self) -> &[&'static str] {
        &self.fk_columns
    }
}

impl<H> Clone for Reverse<H> {
    fn clone(&self) -> Self {
        Self::new(
            self.owner.clone(),
            self.key.clone(),
            self.field,
            &self.fk_columns,
        )
    }
}

impl<H> fmt::Debug for Reverse<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reverse")
            .field("owner", &self.owner)
            .field("field", &self.field)
            .finish()
    }
}
