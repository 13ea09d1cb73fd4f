//! Aggregate functions.
//!
//! - `sum`: Requires a [`Numeric`] type
//! - `count`: Works with any type
//! - `min`, `max`: Work with any type (ordered types in SQL)
//!
//! Over an empty input every aggregate except `count` yields NULL.

use crate::sql::SQL;
use crate::value::FromValue;

use super::Expr;

/// Marker for numeric value types that can be summed.
pub trait Numeric: FromValue {}

impl Numeric for i8 {}
impl Numeric for i16 {}
impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u8 {}
impl Numeric for u16 {}
impl Numeric for u32 {}
impl Numeric for f32 {}
impl Numeric for f64 {}

/// COUNT(*) - counts all rows.
pub fn count_all() -> Expr<i64> {
    Expr::new(SQL::raw("COUNT(*)"))
}

/// COUNT(expr) - counts non-null values.
pub fn count<T>(expr: Expr<T>) -> Expr<i64> {
    Expr::new(SQL::func("COUNT", expr.into_sql()))
}

pub fn sum<T: Numeric>(expr: Expr<T>) -> Expr<T> {
    Expr::new(SQL::func("SUM", expr.into_sql()))
}

pub fn min<T>(expr: Expr<T>) -> Expr<T> {
    Expr::new(SQL::func("MIN", expr.into_sql()))
}

pub fn max<T>(expr: Expr<T>) -> Expr<T> {
    Expr::new(SQL::func("MAX", expr.into_sql()))
}
