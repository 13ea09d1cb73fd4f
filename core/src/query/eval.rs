//! Terminals and aggregates: the operations that run a query.

use std::sync::Arc;

use super::TypedQuery;
use crate::database::{Database, Executor};
use crate::error::{Error, Operation, Result};
use crate::expr::{Expr, Numeric, count_all, not, sum};
use crate::join::JoinResolver;
use crate::mapper::{ResultMapper, Single};
use crate::row::{Row, SelectionIndex};
use crate::sql::{SQL, Token};
use crate::value::{FromValue, Value};

const SUBQUERY: &str = "aggregated";

/// Rows of one evaluation, converted as they are pulled.
pub struct QueryIter<O> {
    rows: std::vec::IntoIter<Vec<Value>>,
    index: SelectionIndex,
    mapper: Arc<dyn ResultMapper<Output = O>>,
    /// Rows with any of these NULL are skipped
    required: Arc<[SQL]>,
    /// Rows still to yield when the bound could not be pushed down
    remaining: Option<u64>,
}

impl<O: 'static> Iterator for QueryIter<O> {
    type Item = Result<O>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }
        loop {
            let row = Row::new(self.rows.next()?, self.index.clone());
            if self.required.iter().any(|key| row.is_null(key)) {
                continue;
            }
            if let Some(remaining) = &mut self.remaining {
                *remaining -= 1;
            }
            return Some(self.mapper.convert(&row));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.rows.size_hint();
        if self.required.is_empty() {
            (lower, upper)
        } else {
            (0, upper)
        }
    }
}

impl<C, O: 'static> TypedQuery<C, O> {
    fn rows<E: Executor>(
        &self,
        db: &Database<E>,
        bound: Option<u64>,
        operation: Operation,
    ) -> Result<QueryIter<O>> {
        // Skipped rows would eat into a pushed-down bound.
        let (pushed, remaining) = if self.required.is_empty() {
            (bound, None)
        } else {
            (None, bound)
        };
        let lowered = self.lower(pushed);
        let rows = db.fetch_as(&lowered.sql, operation)?;
        Ok(QueryIter {
            rows: rows.into_iter(),
            index: lowered.index,
            mapper: self.mapper.clone(),
            required: self.required.clone(),
            remaining,
        })
    }

    pub(crate) fn fetch_bounded<E: Executor>(
        &self,
        db: &Database<E>,
        bound: Option<u64>,
        operation: Operation,
    ) -> Result<Vec<O>> {
        self.rows(db, bound, operation)?.collect()
    }

    /// Run the query and convert every row.
    pub fn to_list<E: Executor>(&self, db: &Database<E>) -> Result<Vec<O>> {
        self.fetch_bounded(db, None, Operation::Query)
    }

    /// Run the query, converting rows lazily. Each call runs the query again.
    pub fn iter<E: Executor>(&self, db: &Database<E>) -> Result<QueryIter<O>> {
        self.rows(db, None, Operation::Query)
    }

    pub fn for_each<E, F>(&self, db: &Database<E>, mut action: F) -> Result<()>
    where
        E: Executor,
        F: FnMut(O),
    {
        for item in self.iter(db)? {
            action(item?);
        }
        Ok(())
    }

    /// The first row, fetching at most one.
    pub fn first_or_null<E: Executor>(&self, db: &Database<E>) -> Result<Option<O>> {
        self.rows(db, Some(1), Operation::Query)?.next().transpose()
    }

    pub fn first<E: Executor>(&self, db: &Database<E>) -> Result<O> {
        self.first_or_null(db)?.ok_or(Error::NotFound)
    }

    pub fn last_or_null<E: Executor>(&self, db: &Database<E>) -> Result<Option<O>> {
        self.rows(db, None, Operation::Query)?.last().transpose()
    }

    pub fn last<E: Executor>(&self, db: &Database<E>) -> Result<O> {
        self.last_or_null(db)?.ok_or(Error::NotFound)
    }

    /// The only row, fetching at most two.
    ///
    /// Returns `None` on no rows and fails with [`Error::Cardinality`] on more
    /// than one.
    pub fn single_or_null<E: Executor>(&self, db: &Database<E>) -> Result<Option<O>> {
        let mut rows = self.rows(db, Some(2), Operation::Query)?;
        let first = rows.next().transpose()?;
        match (first, rows.next()) {
            (None, _) => Ok(None),
            (Some(only), None) => Ok(Some(only)),
            (Some(_), Some(_)) => Err(Error::Cardinality),
        }
    }

    pub fn single<E: Executor>(&self, db: &Database<E>) -> Result<O> {
        self.single_or_null(db)?.ok_or(Error::NotFound)
    }

    pub fn is_not_empty<E: Executor>(&self, db: &Database<E>) -> Result<bool> {
        Ok(self.rows(db, Some(1), Operation::Query)?.next().is_some())
    }

    pub fn is_empty<E: Executor>(&self, db: &Database<E>) -> Result<bool> {
        Ok(!self.is_not_empty(db)?)
    }

    /// Number of rows the query yields, after limit, offset and grouping.
    pub fn count<E: Executor>(&self, db: &Database<E>) -> Result<u64> {
        let total: i64 = self.aggregate(db, |_| count_all())?.unwrap_or(0);
        u64::try_from(total).map_err(|_| Error::Mapping(format!("negative row count {total}")))
    }

    /// Reduce the first selection of the lowered query, run as a subquery.
    fn aggregate<E, V, F>(&self, db: &Database<E>, reduce: F) -> Result<Option<V>>
    where
        E: Executor,
        V: FromValue,
        F: FnOnce(Expr<Value>) -> Expr<V>,
    {
        let (inner, required) = self.lower_aliased();
        let subquery = Arc::<str>::from(SUBQUERY);
        let first = Expr::new(SQL::column(subquery.clone(), "c0"));
        let mut sql = SQL::token(Token::SELECT)
            .append(reduce(first).into_sql())
            .push(Token::FROM)
            .append(inner.parens())
            .push(Token::AS)
            .append(SQL::ident(SUBQUERY));
        if !required.is_empty() {
            sql.push_mut(Token::WHERE);
            sql.append_mut(SQL::join(
                required.into_iter().map(|alias| {
                    SQL::column(subquery.clone(), alias).push(Token::IS_NOT_NULL)
                }),
                Token::AND,
            ));
        }

        let rows = db.fetch_as(&sql, Operation::Query)?;
        match rows.first().and_then(|row| row.first()) {
            Some(value) => Option::<V>::from_value(value),
            None => Ok(None),
        }
    }
}

impl<C: Clone, O: 'static> TypedQuery<C, O> {
    /// Whether any row satisfies `predicate`.
    pub fn any<E, F>(&self, db: &Database<E>, predicate: F) -> Result<bool>
    where
        E: Executor,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<bool>,
    {
        self.filter(predicate).is_not_empty(db)
    }

    /// Whether no row satisfies `predicate`.
    pub fn none<E, F>(&self, db: &Database<E>, predicate: F) -> Result<bool>
    where
        E: Executor,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<bool>,
    {
        self.filter(predicate).is_empty(db)
    }

    /// Whether every row satisfies `predicate`: no row satisfies its negation.
    pub fn all<E, F>(&self, db: &Database<E>, predicate: F) -> Result<bool>
    where
        E: Executor,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<bool>,
    {
        self.filter(|columns, joins| not(predicate(columns, joins)))
            .is_empty(db)
    }

    /// Sum of `value` over all rows, `None` when there are none.
    pub fn sum_of<E, V, F>(&self, db: &Database<E>, value: F) -> Result<Option<V>>
    where
        E: Executor,
        V: Numeric + 'static,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<V>,
    {
        self.map_single(value).sum(db)
    }

    /// The row with the smallest `key`, `None` when there are none.
    pub fn min_by_or_null<E, T, F>(&self, db: &Database<E>, key: F) -> Result<Option<O>>
    where
        E: Executor,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<T>,
    {
        self.sorted_by(key).first_or_null(db)
    }

    /// The row with the largest `key`, `None` when there are none.
    pub fn max_by_or_null<E, T, F>(&self, db: &Database<E>, key: F) -> Result<Option<O>>
    where
        E: Executor,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<T>,
    {
        self.sorted_by_descending(key).first_or_null(db)
    }
}

impl<V: Numeric + 'static> TypedQuery<Single<V>, V> {
    /// Sum of the projected value, `None` when there are no rows.
    pub fn sum<E: Executor>(&self, db: &Database<E>) -> Result<Option<V>> {
        self.aggregate(db, |first| sum(first.cast::<V>()))
    }
}
