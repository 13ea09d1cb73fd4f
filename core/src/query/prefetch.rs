use std::sync::Arc;

use crate::entity::{Entity, FieldRef};
use crate::error::Result;
use crate::foreign_key::ForeignKey;
use crate::mapper::{ForeignKeyLookup, ResultMapper, lookup};
use crate::row::Row;
use crate::sql::SQL;

/// Wraps a mapper so each output's foreign-key cell is populated from the
/// joined target columns of the same row.
pub(super) struct PrefetchMapper<O, T: Entity> {
    pub(super) base: Arc<dyn ResultMapper<Output = O>>,
    pub(super) getter: ForeignKeyLookup<O>,
    pub(super) target: T::Columns,
    /// Primary key of the joined target, NULL when there is nothing to populate
    pub(super) target_key: Vec<SQL>,
}

impl<O: 'static, T: Entity> ResultMapper for PrefetchMapper<O, T> {
    type Output = O;

    fn selections(&self) -> Vec<SQL> {
        let mut selections = self.base.selections();
        selections.extend(self.target.selections());
        selections
    }

    fn convert(&self, row: &Row) -> Result<O> {
        let mut output = self.base.convert(row)?;
        let joined = self.target_key.iter().any(|key| !row.is_null(key));
        if joined
            && let Some(cell) =
                (self.getter)(&mut output).and_then(|slot| slot.downcast_mut::<ForeignKey<T>>())
        {
            cell.populate(self.target.convert(row)?);
        }
        Ok(output)
    }

    /// Cells of the prefetched row resolve through the populated cell, so a
    /// later prefetch can follow a key of the prefetched entity.
    fn foreign_key(&self, field: &FieldRef) -> Option<ForeignKeyLookup<O>> {
        let Some(child) = self.target.foreign_key(field) else {
            return self.base.foreign_key(field);
        };
        let getter = self.getter.clone();
        Some(lookup(move |output: &mut O| {
            let cell = getter(output)?.downcast_mut::<ForeignKey<T>>()?;
            child(cell.cached_mut()?)
        }))
    }
}
