//! The contract between generated table code and the query engine.
//!
//! For every table a generator emits three things: an entity struct
//! implementing [`Entity`], a column view implementing [`TableColumns`] and
//! [`ResultMapper`], and a [`TableDescriptor`]. The column view is bound to a
//! [`Source`] (the table itself, or a join alias) and hands out typed column
//! expressions and foreign-key fields under that qualifier.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use typeq_types::TableDescriptor;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::foreign_key::{ForeignKeyField, Reverse};
use crate::mapper::ResultMapper;
use crate::row::Row;
use crate::sql::SQL;
use crate::value::{FromValue, ToValue, Value};

/// A row type backed by a registered table.
pub trait Entity: Sized + Send + 'static {
    /// Column view bound to a table or alias
    type Columns: TableColumns + ResultMapper<Output = Self>;
    /// Primary key: a scalar, or a tuple in declared key order
    type Key: KeyValues + Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    fn descriptor() -> TableDescriptor;

    fn key(&self) -> Self::Key;

    /// Column values in the descriptor's column order.
    fn split(&self) -> Vec<Value>;
}

/// Typed column view of one table occurrence in a query.
pub trait TableColumns: Clone + Send + Sync + 'static {
    fn bind(source: Source) -> Self;

    fn source(&self) -> &Source;
}

/// Stable identity of a foreign-key field: the declaring entity plus the
/// field's position among its descriptor's foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    entity: TypeId,
    index: u16,
}

impl FieldId {
    pub fn of<E: Entity>(index: u16) -> Self {
        Self {
            entity: TypeId::of::<E>(),
            index,
        }
    }

    pub const fn index(&self) -> u16 {
        self.index
    }
}

/// A foreign-key field as seen through one table occurrence.
///
/// The same field reached through two different aliases yields two distinct
/// references, and so two distinct joins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub(crate) qualifier: Arc<str>,
    pub(crate) id: FieldId,
}

impl FieldRef {
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn id(&self) -> FieldId {
        self.id
    }
}

/// Where a column view reads from: the base table name or a join alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    qualifier: Arc<str>,
    entity: TypeId,
}

impl Source {
    pub fn new<E: Entity>(qualifier: impl Into<Arc<str>>) -> Self {
        Self {
            qualifier: qualifier.into(),
            entity: TypeId::of::<E>(),
        }
    }

    pub fn qualifier(&self) -> &Arc<str> {
        &self.qualifier
    }

    /// Typed reference to `qualifier.name`
    pub fn column<T>(&self, name: impl Into<Cow<'static, str>>) -> Expr<T> {
        Expr::new(SQL::column(self.qualifier.clone(), name))
    }

    /// Selection list for the given columns, in order
    pub fn columns(&self, names: &[&'static str]) -> Vec<SQL> {
        names
            .iter()
            .map(|name| SQL::column(self.qualifier.clone(), *name))
            .collect()
    }

    pub(crate) fn columns_owned(&self, names: &[String]) -> Vec<SQL> {
        names
            .iter()
            .map(|name| SQL::column(self.qualifier.clone(), name.clone()))
            .collect()
    }

    /// Decode one column of this source from a row
    pub fn get<T: FromValue>(&self, row: &Row, name: &'static str) -> Result<T> {
        row.get(&self.column::<T>(name))
    }

    /// The `index`-th foreign key declared by this source's entity
    pub fn foreign_key<T: Entity>(&self, index: u16, columns: &[&'static str]) -> ForeignKeyField<T> {
        ForeignKeyField::new(self.field_ref(index), self.columns(columns), false)
    }

    /// Like [`foreign_key`](Self::foreign_key), for a field whose columns are all nullable
    pub fn nullable_foreign_key<T: Entity>(
        &self,
        index: u16,
        columns: &[&'static str],
    ) -> ForeignKeyField<T> {
        ForeignKeyField::new(self.field_ref(index), self.columns(columns), true)
    }

    /// Reverse reference: rows of `H` whose `index`-th foreign key points here.
    ///
    /// `key_columns` are this table's primary key columns and `fk_columns` the
    /// matching columns on `H`, in key order.
    pub fn reverse<H: Entity>(
        &self,
        key_columns: &[&'static str],
        index: u16,
        fk_columns: &[&'static str],
    ) -> Reverse<H> {
        Reverse::new(
            self.qualifier.clone(),
            self.columns(key_columns),
            FieldId::of::<H>(index),
            fk_columns,
        )
    }

    /// Position of `field` among this source's foreign keys, when the field
    /// was reached through this very source.
    pub fn field_index(&self, field: &FieldRef) -> Option<u16> {
        (field.qualifier == self.qualifier && field.id.entity == self.entity)
            .then_some(field.id.index)
    }

    fn field_ref(&self, index: u16) -> FieldRef {
        FieldRef {
            qualifier: self.qualifier.clone(),
            id: FieldId {
                entity: self.entity,
                index,
            },
        }
    }
}

// =============================================================================
// Keys
// =============================================================================

/// Conversion between a primary key and its ordered column values.
pub trait KeyValues: Sized {
    fn to_values(&self) -> Vec<Value>;

    fn from_values(values: &[Value]) -> Result<Self>;
}

fn arity_mismatch(expected: usize, found: usize) -> Error {
    Error::Mapping(format!(
        "key has {expected} column(s), found {found} value(s)"
    ))
}

macro_rules! scalar_keys {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyValues for $ty {
                fn to_values(&self) -> Vec<Value> {
                    vec![self.to_value()]
                }

                fn from_values(values: &[Value]) -> Result<Self> {
                    match values {
                        [value] => <$ty>::from_value(value),
                        other => Err(arity_mismatch(1, other.len())),
                    }
                }
            }
        )*
    };
}

scalar_keys!(i8, i16, i32, i64, u8, u16, u32, String, Vec<u8>);

#[cfg(feature = "uuid")]
scalar_keys!(uuid::Uuid);

impl<A, B> KeyValues for (A, B)
where
    A: ToValue + FromValue,
    B: ToValue + FromValue,
{
    fn to_values(&self) -> Vec<Value> {
        vec![self.0.to_value(), self.1.to_value()]
    }

    fn from_values(values: &[Value]) -> Result<Self> {
        match values {
            [a, b] => Ok((A::from_value(a)?, B::from_value(b)?)),
            other => Err(arity_mismatch(2, other.len())),
        }
    }
}

impl<A, B, C> KeyValues for (A, B, C)
where
    A: ToValue + FromValue,
    B: ToValue + FromValue,
    C: ToValue + FromValue,
{
    fn to_values(&self) -> Vec<Value> {
        vec![self.0.to_value(), self.1.to_value(), self.2.to_value()]
    }

    fn from_values(values: &[Value]) -> Result<Self> {
        match values {
            [a, b, c] => Ok((A::from_value(a)?, B::from_value(b)?, C::from_value(c)?)),
            other => Err(arity_mismatch(3, other.len())),
        }
    }
}
