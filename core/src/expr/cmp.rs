//! Type-safe comparison functions.
//!
//! The right-hand side must convert into an expression of the left-hand side's
//! type, so comparing a text column with an integer fails to compile.

use crate::sql::{SQL, Token};

use super::{Expr, IntoExpr};

// =============================================================================
// Internal Helper
// =============================================================================

fn binary_op<T>(left: Expr<T>, operator: Token, right: impl IntoExpr<T>) -> Expr<bool> {
    let right_sql = right.into_expr().into_sql();
    // Wrap subqueries (starting with SELECT) in parentheses
    let right_sql = if right_sql.is_subquery() {
        right_sql.parens()
    } else {
        right_sql
    };
    Expr::new(left.into_sql().push(operator).append(right_sql))
}

// =============================================================================
// Equality Comparisons
// =============================================================================

/// Equality comparison (`=`).
pub fn eq<T>(left: Expr<T>, right: impl IntoExpr<T>) -> Expr<bool> {
    binary_op(left, Token::EQ, right)
}

/// Inequality comparison (`<>`).
pub fn ne<T>(left: Expr<T>, right: impl IntoExpr<T>) -> Expr<bool> {
    binary_op(left, Token::NE, right)
}

// =============================================================================
// Ordering Comparisons
// =============================================================================

pub fn lt<T>(left: Expr<T>, right: impl IntoExpr<T>) -> Expr<bool> {
    binary_op(left, Token::LT, right)
}

pub fn le<T>(left: Expr<T>, right: impl IntoExpr<T>) -> Expr<bool> {
    binary_op(left, Token::LE, right)
}

pub fn gt<T>(left: Expr<T>, right: impl IntoExpr<T>) -> Expr<bool> {
    binary_op(left, Token::GT, right)
}

pub fn ge<T>(left: Expr<T>, right: impl IntoExpr<T>) -> Expr<bool> {
    binary_op(left, Token::GE, right)
}

// =============================================================================
// NULL and membership
// =============================================================================

pub fn is_null<T>(expr: Expr<T>) -> Expr<bool> {
    Expr::new(expr.into_sql().push(Token::IS_NULL))
}

pub fn is_not_null<T>(expr: Expr<T>) -> Expr<bool> {
    Expr::new(expr.into_sql().push(Token::IS_NOT_NULL))
}

/// `expr IN (a, b, ...)`. An empty list matches nothing.
pub fn in_list<T, I>(expr: Expr<T>, values: I) -> Expr<bool>
where
    I: IntoIterator,
    I::Item: IntoExpr<T>,
{
    let items: Vec<SQL> = values
        .into_iter()
        .map(|v| v.into_expr().into_sql())
        .collect();
    if items.is_empty() {
        return Expr::new(SQL::raw("0 = 1"));
    }
    Expr::new(
        expr.into_sql()
            .push(Token::IN)
            .append(SQL::join(items, Token::COMMA).parens()),
    )
}
