//! Logical operators (AND, OR, NOT).
//!
//! ```ignore
//! // Function style
//! and(condition1, condition2)
//! not(condition)
//!
//! // Operator style (via std::ops traits)
//! condition1 & condition2   // BitAnd
//! condition1 | condition2   // BitOr
//! !condition                // Not
//! ```

use std::ops::{BitAnd, BitOr, Not};

use crate::sql::{SQL, SQLChunk, Token};

use super::Expr;

fn grouped(sql: SQL) -> SQL {
    let atomic = sql.chunks.len() == 1
        && matches!(
            sql.chunks[0],
            SQLChunk::Raw(_) | SQLChunk::Column { .. } | SQLChunk::Param(_)
        );
    if atomic { sql } else { sql.parens() }
}

/// Logical NOT.
pub fn not(expr: Expr<bool>) -> Expr<bool> {
    Expr::new(SQL::token(Token::NOT).append(grouped(expr.into_sql())))
}

/// Logical AND of two conditions, each parenthesised.
pub fn and(left: Expr<bool>, right: Expr<bool>) -> Expr<bool> {
    Expr::new(
        grouped(left.into_sql())
            .push(Token::AND)
            .append(grouped(right.into_sql())),
    )
}

/// Logical OR of two conditions, each parenthesised.
pub fn or(left: Expr<bool>, right: Expr<bool>) -> Expr<bool> {
    Expr::new(
        grouped(left.into_sql())
            .push(Token::OR)
            .append(grouped(right.into_sql())),
    )
}

impl Not for Expr<bool> {
    type Output = Expr<bool>;

    fn not(self) -> Self::Output {
        not(self)
    }
}

impl BitAnd for Expr<bool> {
    type Output = Expr<bool>;

    fn bitand(self, rhs: Self) -> Self::Output {
        and(self, rhs)
    }
}

impl BitOr for Expr<bool> {
    type Output = Expr<bool>;

    fn bitor(self, rhs: Self) -> Self::Output {
        or(self, rhs)
    }
}
