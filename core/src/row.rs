//! Result rows addressed by selection.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::sql::SQL;
use crate::value::{FromValue, Value};

/// Position of every distinct selection in a lowered query, keyed by
/// [`SQL::key`].
pub type SelectionIndex = Arc<HashMap<String, usize>>;

/// One fetched row.
///
/// Mappers read values by the expression they selected, not by position, so
/// mappers can be composed without agreeing on column offsets.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<Value>,
    index: SelectionIndex,
}

impl Row {
    pub fn new(values: Vec<Value>, index: SelectionIndex) -> Self {
        Self { values, index }
    }

    /// Raw value of a selected fragment.
    pub fn value(&self, selection: &SQL) -> Result<&Value> {
        let key = selection.key();
        self.index
            .get(&key)
            .and_then(|&i| self.values.get(i))
            .ok_or_else(|| Error::Mapping(format!("`{key}` is not selected by this query")))
    }

    /// Decode a selected expression.
    pub fn get<T: FromValue>(&self, expr: &Expr<T>) -> Result<T> {
        T::from_value(self.value(expr.as_sql())?)
    }

    /// `true` when the selection is absent or NULL.
    pub fn is_null(&self, selection: &SQL) -> bool {
        self.value(selection).map_or(true, Value::is_null)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
