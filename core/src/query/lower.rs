//! Lowering a [`TypedQuery`] to one SQL statement.

use std::sync::Arc;

use hashbrown::HashMap;

use super::TypedQuery;
use crate::row::SelectionIndex;
use crate::sql::{SQL, Token};

/// A lowered query and the position of each distinct selection.
pub(crate) struct Lowered {
    pub(crate) sql: SQL,
    pub(crate) index: SelectionIndex,
}

fn number(n: u64) -> SQL {
    SQL::number(i64::try_from(n).unwrap_or(i64::MAX))
}

impl<C, O: 'static> TypedQuery<C, O> {
    /// Distinct selections in first-seen order, with their index.
    fn selection_list(&self) -> (Vec<SQL>, SelectionIndex) {
        let mut selections = Vec::new();
        let mut index = HashMap::new();
        let required = self.required.iter().cloned();
        for selection in self.mapper.selections().into_iter().chain(required) {
            let key = selection.key();
            if !index.contains_key(&key) {
                index.insert(key, selections.len());
                selections.push(selection);
            }
        }
        (selections, Arc::new(index))
    }

    /// Limit after applying an evaluation bound: never wider than either.
    pub(crate) fn bounded_limit(&self, bound: Option<u64>) -> Option<u64> {
        match (self.limit, bound) {
            (Some(limit), Some(bound)) => Some(limit.min(bound)),
            (limit, None) => limit,
            (None, bound) => bound,
        }
    }

    /// Everything after the selection list: `FROM .. LIMIT .. OFFSET ..`
    fn body(&self, limit: Option<u64>) -> SQL {
        let mut sql = SQL::token(Token::FROM).append(self.base.table.to_sql());

        for join in self.joins.iter() {
            sql.append_mut(join.to_sql());
        }

        if let Some(condition) = &self.condition {
            sql.push_mut(Token::WHERE);
            sql.append_mut(condition.as_sql().clone());
        }

        if !self.group_by.is_empty() {
            sql.push_mut(Token::GROUP_BY);
            sql.append_mut(SQL::join(self.group_by.iter().cloned(), Token::COMMA));
        }

        if let Some(having) = &self.having {
            sql.push_mut(Token::HAVING);
            sql.append_mut(having.as_sql().clone());
        }

        if !self.order.is_empty() {
            sql.push_mut(Token::ORDER_BY);
            sql.append_mut(SQL::join(
                self.order.iter().map(|(key, order)| order.apply(key.clone())),
                Token::COMMA,
            ));
        }

        match (limit, self.offset) {
            (Some(limit), offset) => {
                sql.push_mut(Token::LIMIT);
                sql.append_mut(number(limit));
                if let Some(offset) = offset {
                    sql.push_mut(Token::OFFSET);
                    sql.append_mut(number(offset));
                }
            }
            (None, Some(offset)) => {
                sql.push_mut(Token::LIMIT);
                sql.append_mut(SQL::number(-1));
                sql.push_mut(Token::OFFSET);
                sql.append_mut(number(offset));
            }
            (None, None) => {}
        }

        sql
    }

    /// `SELECT <selections> FROM ...` with the evaluation bound applied.
    pub(crate) fn lower(&self, bound: Option<u64>) -> Lowered {
        let (selections, index) = self.selection_list();
        let sql = SQL::token(Token::SELECT)
            .append(SQL::join(selections, Token::COMMA))
            .append(self.body(self.bounded_limit(bound)));
        Lowered { sql, index }
    }

    /// The lowered query with each selection aliased `c0`, `c1`, ..., for use
    /// as a subquery, and the aliases of the keys rows must have non-null.
    pub(crate) fn lower_aliased(&self) -> (SQL, Vec<String>) {
        let (selections, index) = self.selection_list();
        let required = self
            .required
            .iter()
            .filter_map(|key| index.get(&key.key()))
            .map(|i| format!("c{i}"))
            .collect();
        let aliased = selections
            .into_iter()
            .enumerate()
            .map(|(i, selection)| selection.alias(format!("c{i}")));
        let sql = SQL::token(Token::SELECT)
            .append(SQL::join(aliased, Token::COMMA))
            .append(self.body(self.limit));
        (sql, required)
    }
}
