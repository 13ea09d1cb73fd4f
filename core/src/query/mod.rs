//! Typed query engine.
//!
//! A [`TypedQuery`] is an immutable description of one SQL `SELECT`: the base
//! table, the column view handed to operator closures, the mapper that turns
//! rows into values, and the accumulated condition, ordering, joins and
//! pagination. Every operator returns a new query; nothing touches the
//! database until a terminal such as [`TypedQuery::to_list`] runs.
//!
//! Operator closures receive the column view and a [`JoinResolver`]. Following
//! a foreign key through the resolver joins the target table once per query,
//! no matter how many operators dereference it.

mod eval;
mod lower;
mod prefetch;

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

pub use eval::QueryIter;
use prefetch::PrefetchMapper;

use crate::entity::{Entity, KeyValues, Source};
use crate::error::{Error, Result};
use crate::expr::{Expr, and, is_not_null};
use crate::foreign_key::{ForeignKeyField, Reverse};
use crate::join::{JoinResolver, Joins, TableName, extend_grouping};
use crate::mapper::{Pair, ResultMapper, Single};
use crate::order::SortOrder;
use crate::sql::{SQL, Token};
use crate::value::{FromValue, Value};

/// The table a query reads from.
#[derive(Debug, Clone)]
pub(crate) struct Base {
    pub(crate) table: TableName,
    /// Primary key columns under the table qualifier
    pub(crate) key: Vec<SQL>,
}

/// A lazily lowered, immutable query.
///
/// `C` is the column view operator closures receive and `O` the value each
/// row maps to. Entity queries start from [`Registry::all`](crate::Registry::all)
/// or [`Database::all`](crate::Database::all).
pub struct TypedQuery<C, O> {
    pub(crate) base: Base,
    pub(crate) columns: C,
    pub(crate) mapper: Arc<dyn ResultMapper<Output = O>>,
    pub(crate) condition: Option<Expr<bool>>,
    /// Predicates over reverse-reference aggregates, applied after grouping
    pub(crate) having: Option<Expr<bool>>,
    pub(crate) order: Vec<(SQL, SortOrder)>,
    pub(crate) joins: Joins,
    /// Empty unless a reverse reference was aggregated
    pub(crate) group_by: Vec<SQL>,
    /// Primary key of the current subject, the base until a hop
    pub(crate) subject: Vec<SQL>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    /// Keys that must be non-null for a fetched row to be yielded
    pub(crate) required: Arc<[SQL]>,
}

impl<E: Entity> TypedQuery<E::Columns, E> {
    /// Every row of `E`: all declared columns, no condition, no joins.
    pub fn from_table() -> Self {
        let descriptor = E::descriptor();
        let source = Source::new::<E>(descriptor.name.as_str());
        let key = source.columns_owned(&descriptor.primary_key);
        let columns = <E::Columns as crate::entity::TableColumns>::bind(source);
        Self {
            base: Base {
                table: TableName::of(&descriptor),
                key: key.clone(),
            },
            mapper: Arc::new(columns.clone()),
            columns,
            condition: None,
            having: None,
            order: Vec::new(),
            joins: Joins::default(),
            group_by: Vec::new(),
            subject: key,
            limit: None,
            offset: None,
            required: Arc::from([]),
        }
    }

    /// Restrict to the row whose primary key equals `key`.
    pub(crate) fn with_key(mut self, key: &E::Key) -> Self {
        let matches = SQL::join(
            self.base
                .key
                .iter()
                .zip(key.to_values())
                .map(|(column, value)| {
                    column
                        .clone()
                        .push(Token::EQ)
                        .append(SQL::param(value))
                }),
            Token::AND,
        );
        self.condition = Some(Expr::new(matches));
        self
    }
}

impl<C: Clone, O: 'static> TypedQuery<C, O> {
    fn resolver(&self) -> JoinResolver {
        JoinResolver::new(self.joins.clone(), self.group_by.clone(), self.subject.clone())
    }

    /// Same columns and mapper, joins taken from `resolver`.
    fn resolved(&self, resolver: JoinResolver) -> Self {
        self.rebuild(resolver, self.columns.clone(), self.mapper.clone())
    }

    fn rebuild<C2, O2>(
        &self,
        resolver: JoinResolver,
        columns: C2,
        mapper: Arc<dyn ResultMapper<Output = O2>>,
    ) -> TypedQuery<C2, O2> {
        let (joins, group_by) = resolver.finish();
        TypedQuery {
            base: self.base.clone(),
            columns,
            mapper,
            condition: self.condition.clone(),
            having: self.having.clone(),
            order: self.order.clone(),
            joins,
            group_by,
            subject: self.subject.clone(),
            limit: self.limit,
            offset: self.offset,
            required: self.required.clone(),
        }
    }

    fn and_condition(&mut self, condition: Expr<bool>) {
        self.condition = Some(match self.condition.take() {
            Some(existing) => and(existing, condition),
            None => condition,
        });
    }

    fn and_having(&mut self, condition: Expr<bool>) {
        self.having = Some(match self.having.take() {
            Some(existing) => and(existing, condition),
            None => condition,
        });
    }

    /// Keep rows matching `predicate`, AND-ed onto any existing condition.
    ///
    /// A predicate over [`JoinResolver::count`] is applied after grouping.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: FnOnce(&C, &mut JoinResolver) -> Expr<bool>,
    {
        let mut resolver = self.resolver();
        let condition = predicate(&self.columns, &mut resolver);
        let aggregated = resolver.aggregated();
        let mut query = self.resolved(resolver);
        if aggregated {
            query.and_having(condition);
        } else {
            query.and_condition(condition);
        }
        query
    }

    /// Order by one key, ascending with nulls last. Replaces any ordering.
    pub fn sorted_by<T, F>(&self, key: F) -> Self
    where
        F: FnOnce(&C, &mut JoinResolver) -> Expr<T>,
    {
        self.sorted(key, SortOrder::ASC_NULLS_LAST)
    }

    /// Order by one key, descending with nulls last. Replaces any ordering.
    pub fn sorted_by_descending<T, F>(&self, key: F) -> Self
    where
        F: FnOnce(&C, &mut JoinResolver) -> Expr<T>,
    {
        self.sorted(key, SortOrder::DESC_NULLS_LAST)
    }

    fn sorted<T, F>(&self, key: F, order: SortOrder) -> Self
    where
        F: FnOnce(&C, &mut JoinResolver) -> Expr<T>,
    {
        let mut resolver = self.resolver();
        let key = key(&self.columns, &mut resolver).into_sql();
        let mut query = self.resolved(resolver);
        query.order = vec![(key, order)];
        query
    }

    /// Flip every ordering key. Applying it twice restores the ordering.
    pub fn reversed(&self) -> Self {
        let mut query = self.clone();
        for (_, order) in &mut query.order {
            *order = order.reversed();
        }
        query
    }

    /// Add `count` to the limit.
    pub fn take(&self, count: u64) -> Self {
        let mut query = self.clone();
        query.limit = Some(count.saturating_add(self.limit.unwrap_or(0)));
        query
    }

    /// Add `count` to the offset.
    pub fn drop(&self, count: u64) -> Self {
        let mut query = self.clone();
        query.offset = Some(count.saturating_add(self.offset.unwrap_or(0)));
        query
    }

    /// Project each row onto one expression.
    pub fn map_single<V, F>(&self, select: F) -> TypedQuery<Single<V>, V>
    where
        V: FromValue + 'static,
        F: FnOnce(&C, &mut JoinResolver) -> Expr<V>,
    {
        let mut resolver = self.resolver();
        let mapper = Single {
            value: select(&self.columns, &mut resolver),
        };
        self.rebuild(resolver, mapper.clone(), Arc::new(mapper))
    }

    /// Project each row onto two expressions.
    pub fn map_pair<A, B, F>(&self, select: F) -> TypedQuery<Pair<A, B>, (A, B)>
    where
        A: FromValue + 'static,
        B: FromValue + 'static,
        F: FnOnce(&C, &mut JoinResolver) -> (Expr<A>, Expr<B>),
    {
        let mut resolver = self.resolver();
        let (first, second) = select(&self.columns, &mut resolver);
        let mapper = Pair { first, second };
        self.rebuild(resolver, mapper.clone(), Arc::new(mapper))
    }

    /// Project each row through a custom mapper, which also becomes the
    /// column view for later operators.
    pub fn map<M, F>(&self, select: F) -> TypedQuery<M, M::Output>
    where
        M: ResultMapper + Clone,
        F: FnOnce(&C, &mut JoinResolver) -> M,
    {
        let mut resolver = self.resolver();
        let mapper = select(&self.columns, &mut resolver);
        self.rebuild(resolver, mapper.clone(), Arc::new(mapper))
    }

    /// Follow a foreign key: each row becomes the row it references.
    ///
    /// Rows whose reference is null, or points at no row, are skipped.
    pub fn map_fk<T, F>(&self, field: F) -> TypedQuery<T::Columns, T>
    where
        T: Entity,
        F: FnOnce(&C, &mut JoinResolver) -> ForeignKeyField<T>,
    {
        let mut resolver = self.resolver();
        let fk = field(&self.columns, &mut resolver);
        let join = resolver.forward_join(&fk);
        let subject = join.key.clone();
        let columns = <T::Columns as crate::entity::TableColumns>::bind(join.source.clone());

        let mut query: TypedQuery<_, _> = self.rebuild(resolver, columns.clone(), Arc::new(columns));
        query.follow(subject);
        query
    }

    /// Follow a reverse reference: each row becomes each row of `H` pointing at it.
    ///
    /// Rows with no related rows contribute nothing.
    pub fn flat_map_reverse<H, F>(&self, reverse: F) -> TypedQuery<H::Columns, H>
    where
        H: Entity,
        F: FnOnce(&C, &mut JoinResolver) -> Reverse<H>,
    {
        let mut resolver = self.resolver();
        let reverse = reverse(&self.columns, &mut resolver);
        let join = resolver.reverse_join(&reverse);
        let subject = join.key.clone();
        let columns = <H::Columns as crate::entity::TableColumns>::bind(join.source.clone());

        let mut query: TypedQuery<_, _> = self.rebuild(resolver, columns.clone(), Arc::new(columns));
        query.follow(subject);
        query
    }

    /// Make the joined row with primary key `subject` the row each result
    /// maps to. A grouped query keeps one group per new subject row.
    fn follow(&mut self, subject: Vec<SQL>) {
        if !self.group_by.is_empty() {
            extend_grouping(&mut self.group_by, &subject);
        }
        self.require(subject.first().cloned());
        self.subject = subject;
    }

    /// Drop rows whose `key` is NULL. Once paginated, the check runs on
    /// fetched rows so pagination still counts the rows before the hop.
    fn require(&mut self, key: Option<SQL>) {
        let Some(key) = key else {
            return;
        };
        if self.limit.is_none() && self.offset.is_none() {
            self.and_condition(is_not_null(Expr::<Value>::new(key)));
        } else {
            self.required = self.required.iter().cloned().chain([key]).collect();
        }
    }

    /// Load the row behind a foreign key in the same query.
    ///
    /// Each output's foreign-key cell for `field` is populated from the joined
    /// columns, so a later `value` call does not query. Fails with
    /// [`Error::PrefetchUnavailable`] when the output has no such cell.
    pub fn prefetch<T, F>(&self, field: F) -> Result<Self>
    where
        T: Entity,
        F: FnOnce(&C, &mut JoinResolver) -> ForeignKeyField<T>,
    {
        let mut resolver = self.resolver();
        let fk = field(&self.columns, &mut resolver);
        let getter = self.mapper.foreign_key(fk.field()).ok_or_else(|| {
            Error::PrefetchUnavailable(format!(
                "{} -> {}",
                fk.field().qualifier(),
                type_name::<T>()
            ))
        })?;

        let join = resolver.forward_join(&fk);
        let mapper = PrefetchMapper::<O, T> {
            base: self.mapper.clone(),
            getter,
            target: <T::Columns as crate::entity::TableColumns>::bind(join.source.clone()),
            target_key: join.key.clone(),
        };
        Ok(self.rebuild(resolver, self.columns.clone(), Arc::new(mapper)))
    }

    /// The SQL this query lowers to.
    pub fn to_sql(&self) -> SQL {
        self.lower(None).sql
    }

    pub fn columns(&self) -> &C {
        &self.columns
    }

    /// Number of distinct joins the query carries.
    pub fn join_count(&self) -> usize {
        self.joins.len()
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }
}

impl<C: Clone, O> Clone for TypedQuery<C, O> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            columns: self.columns.clone(),
            mapper: self.mapper.clone(),
            condition: self.condition.clone(),
            having: self.having.clone(),
            order: self.order.clone(),
            joins: self.joins.clone(),
            group_by: self.group_by.clone(),
            subject: self.subject.clone(),
            limit: self.limit,
            offset: self.offset,
            required: self.required.clone(),
        }
    }
}

impl<C, O> fmt::Debug for TypedQuery<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedQuery")
            .field("base", &self.base.table)
            .field("condition", &self.condition)
            .field("having", &self.having)
            .field("order", &self.order)
            .field("joins", &self.joins.len())
            .field("group_by", &self.group_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
