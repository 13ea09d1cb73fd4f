//! Result mappers: what a query selects and how a row becomes a value.

use std::any::Any;
use std::sync::Arc;

use crate::entity::FieldRef;
use crate::error::Result;
use crate::expr::Expr;
use crate::row::Row;
use crate::sql::SQL;
use crate::value::FromValue;

/// Reaches a foreign-key cell inside a mapped value.
///
/// Returns `None` when the cell is absent, e.g. a nullable foreign key that
/// holds no key. The `dyn Any` downcasts to `ForeignKey<Target>`.
pub type ForeignKeyLookup<T> =
    Arc<dyn Fn(&mut T) -> Option<&mut (dyn Any + 'static)> + Send + Sync>;

/// Wraps a closure as a [`ForeignKeyLookup`].
///
/// ```ignore
/// lookup(|e: &mut Employee| Some(e.company.slot()))
/// ```
pub fn lookup<T, F>(f: F) -> ForeignKeyLookup<T>
where
    F: Fn(&mut T) -> Option<&mut (dyn Any + 'static)> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Declares the selections of a query and converts each fetched row.
pub trait ResultMapper: Send + Sync + 'static {
    type Output;

    /// Expressions to select. Duplicates across composed mappers are selected once.
    fn selections(&self) -> Vec<SQL>;

    fn convert(&self, row: &Row) -> Result<Self::Output>;

    /// Accessor for the foreign-key cell identified by `field`, if the output
    /// contains one. Used by prefetch to populate cells from joined columns.
    fn foreign_key(&self, field: &FieldRef) -> Option<ForeignKeyLookup<Self::Output>> {
        let _ = field;
        None
    }
}

impl<M: ResultMapper + ?Sized> ResultMapper for Arc<M> {
    type Output = M::Output;

    fn selections(&self) -> Vec<SQL> {
        (**self).selections()
    }

    fn convert(&self, row: &Row) -> Result<Self::Output> {
        (**self).convert(row)
    }

    fn foreign_key(&self, field: &FieldRef) -> Option<ForeignKeyLookup<Self::Output>> {
        (**self).foreign_key(field)
    }
}

/// Mapper for a single projected expression.
#[derive(Debug)]
pub struct Single<V> {
    pub value: Expr<V>,
}

impl<V> Clone for Single<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<V: FromValue + 'static> ResultMapper for Single<V> {
    type Output = V;

    fn selections(&self) -> Vec<SQL> {
        vec![self.value.as_sql().clone()]
    }

    fn convert(&self, row: &Row) -> Result<V> {
        row.get(&self.value)
    }
}

/// Mapper for two projected expressions.
#[derive(Debug)]
pub struct Pair<A, B> {
    pub first: Expr<A>,
    pub second: Expr<B>,
}

impl<A, B> Clone for Pair<A, B> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
        }
    }
}

impl<A, B> ResultMapper for Pair<A, B>
where
    A: FromValue + 'static,
    B: FromValue + 'static,
{
    type Output = (A, B);

    fn selections(&self) -> Vec<SQL> {
        vec![self.first.as_sql().clone(), self.second.as_sql().clone()]
    }

    fn convert(&self, row: &Row) -> Result<(A, B)> {
        Ok((row.get(&self.first)?, row.get(&self.second)?))
    }
}
