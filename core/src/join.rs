//! Join registry and the resolver that binds foreign-key hops to aliases.
//!
//! Each distinct reference (a foreign-key field or reverse reference, seen
//! through a specific table occurrence) joins at most once per query. The first
//! use allocates an alias `joined_a`, `joined_b`, ... and later uses reuse it.

use std::sync::Arc;

use hashbrown::HashMap;
use typeq_types::TableDescriptor;

use crate::entity::{Entity, FieldRef, Source, TableColumns};
use crate::expr::{Expr, count, count_all};
use crate::foreign_key::{ForeignKeyField, Reverse};
use crate::sql::{SQL, Token};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum JoinKey {
    Forward(FieldRef),
    Reverse(FieldRef),
}

/// A table reference for FROM and JOIN clauses: `"schema"."name"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableName {
    pub(crate) name: String,
    pub(crate) schema: Option<String>,
}

impl TableName {
    pub(crate) fn of(descriptor: &TableDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            schema: descriptor.schema.clone(),
        }
    }

    pub(crate) fn to_sql(&self) -> SQL {
        match &self.schema {
            Some(schema) => SQL::ident(schema.clone())
                .push(Token::DOT)
                .append(SQL::ident(self.name.clone())),
            None => SQL::ident(self.name.clone()),
        }
    }
}

/// One LEFT JOIN of the lowered query
#[derive(Debug, Clone)]
pub(crate) struct Join {
    pub(crate) table: TableName,
    pub(crate) source: Source,
    /// Primary key columns of the joined table under its alias
    pub(crate) key: Vec<SQL>,
    pub(crate) on: SQL,
}

impl Join {
    pub(crate) fn to_sql(&self) -> SQL {
        SQL::token(Token::LEFT_JOIN)
            .append(self.table.to_sql())
            .push(Token::AS)
            .append(SQL::ident(self.source.qualifier().to_string()))
            .push(Token::ON)
            .append(self.on.clone())
    }
}

/// Insertion-ordered joins with lookup by reference.
#[derive(Debug, Clone, Default)]
pub(crate) struct Joins {
    entries: Vec<Join>,
    index: HashMap<JoinKey, usize>,
}

impl Joins {
    fn insert(&mut self, key: JoinKey, join: Join) {
        let idx = self.entries.len();
        self.entries.push(join);
        self.index.insert(key, idx);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Join> {
        self.entries.iter()
    }
}

/// `joined_a` .. `joined_z`, then `joined_aa`, `joined_ab`, ...
pub(crate) fn alias_name(ordinal: usize) -> String {
    let mut n = ordinal + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().fold(String::from("joined_"), |mut name, c| {
        name.push(*c);
        name
    })
}

/// Equates `left[i]` with `right[i]` pairwise, AND-ed.
fn matching(left: &[SQL], right: &[SQL]) -> SQL {
    SQL::join(
        left.iter().zip(right).map(|(l, r)| {
            l.clone()
                .push(Token::EQ)
                .append(r.clone())
        }),
        Token::AND,
    )
}

/// Appends the columns of `keys` not grouped yet.
pub(crate) fn extend_grouping(group_by: &mut Vec<SQL>, keys: &[SQL]) {
    for key in keys {
        let name = key.key();
        if !group_by.iter().any(|grouped| grouped.key() == name) {
            group_by.push(key.clone());
        }
    }
}

/// Binds foreign-key hops inside a query operator to joins.
///
/// Every closure passed to a [`TypedQuery`](crate::TypedQuery) operator receives
/// the column view and a resolver. Joins allocated through the resolver are
/// carried by the query the operator returns.
///
/// ```ignore
/// employees.filter(|e, j| j.value(&e.company()).name().eq("Acme"))
/// ```
#[derive(Debug)]
pub struct JoinResolver {
    joins: Joins,
    group_by: Vec<SQL>,
    /// Primary key of the rows the query currently yields
    subject: Vec<SQL>,
    /// Set once an aggregate over a reverse reference is built
    aggregated: bool,
}

impl JoinResolver {
    pub(crate) fn new(joins: Joins, group_by: Vec<SQL>, subject: Vec<SQL>) -> Self {
        Self {
            joins,
            group_by,
            subject,
            aggregated: false,
        }
    }

    pub(crate) fn aggregated(&self) -> bool {
        self.aggregated
    }

    pub(crate) fn finish(self) -> (Joins, Vec<SQL>) {
        (self.joins, self.group_by)
    }

    /// Group by the current subject and the owner of a reverse reference, so
    /// neither is collapsed while the related rows are.
    fn group_by_owner(&mut self, owner: &[SQL]) {
        extend_grouping(&mut self.group_by, &self.subject);
        extend_grouping(&mut self.group_by, owner);
    }

    /// Columns of the row `fk` points at, joined on first use.
    pub fn value<T: Entity>(&mut self, fk: &ForeignKeyField<T>) -> T::Columns {
        T::Columns::bind(self.forward_join(fk).source.clone())
    }

    /// Columns of the related rows of `H`, joined on first use.
    ///
    /// Groups the query by the current row and the owner's primary key, so a
    /// predicate over these columns keeps each row once if any related row
    /// matches.
    pub fn any_value<H: Entity>(&mut self, reverse: &Reverse<H>) -> H::Columns {
        self.group_by_owner(reverse.key());
        H::Columns::bind(self.reverse_join(reverse).source.clone())
    }

    /// Whether any related row of `H` satisfies `predicate`.
    ///
    /// Each row of the query appears once.
    pub fn any<H, F>(&mut self, reverse: &Reverse<H>, predicate: F) -> Expr<bool>
    where
        H: Entity,
        F: FnOnce(&H::Columns) -> Expr<bool>,
    {
        predicate(&self.any_value(reverse))
    }

    /// Number of related rows of `H`. Groups the query like [`Self::any_value`].
    ///
    /// A filter built over the count applies after grouping, as `HAVING`.
    pub fn count<H: Entity>(&mut self, reverse: &Reverse<H>) -> Expr<i64> {
        self.group_by_owner(reverse.key());
        self.aggregated = true;
        match self.reverse_join(reverse).key.first() {
            Some(key) => count(Expr::<Value>::new(key.clone())),
            None => count_all(),
        }
    }

    pub fn join_count(&self) -> usize {
        self.joins.len()
    }

    pub(crate) fn forward_join<T: Entity>(&mut self, fk: &ForeignKeyField<T>) -> &Join {
        let key = JoinKey::Forward(fk.field().clone());
        if !self.joins.index.contains_key(&key) {
            let descriptor = T::descriptor();
            let source = Source::new::<T>(Arc::<str>::from(alias_name(self.joins.len())));
            let target_key = source.columns_owned(&descriptor.primary_key);
            let on = matching(&target_key, fk.columns());
            self.joins.insert(
                key.clone(),
                Join {
                    table: TableName::of(&descriptor),
                    source,
                    key: target_key,
                    on,
                },
            );
        }
        let idx = self.joins.index[&key];
        &self.joins.entries[idx]
    }

    pub(crate) fn reverse_join<H: Entity>(&mut self, reverse: &Reverse<H>) -> &Join {
        let key = JoinKey::Reverse(reverse.field_ref());
        if !self.joins.index.contains_key(&key) {
            let descriptor = H::descriptor();
            let source = Source::new::<H>(Arc::<str>::from(alias_name(self.joins.len())));
            let linked = source.columns(reverse.fk_columns());
            let on = matching(reverse.key(), &linked);
            self.joins.insert(
                key.clone(),
                Join {
                    table: TableName::of(&descriptor),
                    key: source.columns_owned(&descriptor.primary_key),
                    source,
                    on,
                },
            );
        }
        let idx = self.joins.index[&key];
        &self.joins.entries[idx]
    }
}
