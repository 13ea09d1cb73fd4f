//! Expr - A typed SQL expression wrapper.

use std::fmt;
use std::marker::PhantomData;

use crate::sql::{SQL, ToSQL};
use crate::value::{ToValue, Value};

/// A SQL expression that carries the Rust type its value decodes to.
///
/// Nullable columns are `Expr<Option<T>>`. The wrapper is a zero-cost marker
/// around the SQL fragment; `fn() -> T` keeps it `Send + Sync` for any `T`.
pub struct Expr<T> {
    sql: SQL,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Expr<T> {
    /// Create a new typed expression from raw SQL.
    #[inline]
    pub fn new(sql: SQL) -> Self {
        Self {
            sql,
            _ty: PhantomData,
        }
    }

    /// Consume the wrapper and return the inner SQL.
    #[inline]
    pub fn into_sql(self) -> SQL {
        self.sql
    }

    /// Get a reference to the inner SQL.
    #[inline]
    pub fn as_sql(&self) -> &SQL {
        &self.sql
    }

    /// Change the value type marker (internal use only).
    #[inline]
    pub(crate) fn cast<U>(self) -> Expr<U> {
        Expr::new(self.sql)
    }
}

/// A bound literal.
///
/// ```
/// use typeq_core::expr::literal;
///
/// assert_eq!(literal(5_i64).as_sql().sql(), "?");
/// ```
pub fn literal<T: ToValue>(value: T) -> Expr<T> {
    Expr::new(SQL::param(value.to_value()))
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Expr::new(self.sql.clone())
    }
}

impl<T> fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expr").field(&self.sql.sql()).finish()
    }
}

impl<T> ToSQL for Expr<T> {
    fn to_sql(&self) -> SQL {
        self.sql.clone()
    }

    fn into_sql(self) -> SQL {
        self.sql
    }
}

impl<T> From<Expr<T>> for SQL {
    fn from(expr: Expr<T>) -> Self {
        expr.sql
    }
}

// =============================================================================
// Operand conversion
// =============================================================================

/// Anything usable as the right-hand side of an operator against `Expr<T>`.
///
/// Implemented for expressions of the same type, non-null expressions against
/// nullable ones, and plain Rust literals.
pub trait IntoExpr<T> {
    fn into_expr(self) -> Expr<T>;
}

impl<T> IntoExpr<T> for Expr<T> {
    #[inline]
    fn into_expr(self) -> Expr<T> {
        self
    }
}

impl<T> IntoExpr<T> for &Expr<T> {
    #[inline]
    fn into_expr(self) -> Expr<T> {
        self.clone()
    }
}

impl<T> IntoExpr<Option<T>> for Expr<T> {
    #[inline]
    fn into_expr(self) -> Expr<Option<T>> {
        self.cast()
    }
}

impl<T> IntoExpr<Option<T>> for &Expr<T> {
    #[inline]
    fn into_expr(self) -> Expr<Option<T>> {
        self.clone().cast()
    }
}

macro_rules! literal_operands {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoExpr<$ty> for $ty {
                #[inline]
                fn into_expr(self) -> Expr<$ty> {
                    literal(self)
                }
            }

            impl IntoExpr<Option<$ty>> for $ty {
                #[inline]
                fn into_expr(self) -> Expr<Option<$ty>> {
                    Expr::new(SQL::param(self.to_value()))
                }
            }

            impl IntoExpr<Option<$ty>> for Option<$ty> {
                #[inline]
                fn into_expr(self) -> Expr<Option<$ty>> {
                    literal(self)
                }
            }
        )*
    };
}

literal_operands!(i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, String, Vec<u8>);

#[cfg(feature = "uuid")]
literal_operands!(uuid::Uuid);

impl IntoExpr<String> for &str {
    #[inline]
    fn into_expr(self) -> Expr<String> {
        Expr::new(SQL::param(Value::from(self)))
    }
}

impl IntoExpr<Option<String>> for &str {
    #[inline]
    fn into_expr(self) -> Expr<Option<String>> {
        Expr::new(SQL::param(Value::from(self)))
    }
}

// =============================================================================
// Method sugar
// =============================================================================

impl<T> Expr<T> {
    pub fn eq(self, other: impl IntoExpr<T>) -> Expr<bool> {
        super::eq(self, other)
    }

    pub fn ne(self, other: impl IntoExpr<T>) -> Expr<bool> {
        super::ne(self, other)
    }

    pub fn lt(self, other: impl IntoExpr<T>) -> Expr<bool> {
        super::lt(self, other)
    }

    pub fn le(self, other: impl IntoExpr<T>) -> Expr<bool> {
        super::le(self, other)
    }

    pub fn gt(self, other: impl IntoExpr<T>) -> Expr<bool> {
        super::gt(self, other)
    }

    pub fn ge(self, other: impl IntoExpr<T>) -> Expr<bool> {
        super::ge(self, other)
    }

    pub fn is_null(self) -> Expr<bool> {
        super::is_null(self)
    }

    pub fn is_not_null(self) -> Expr<bool> {
        super::is_not_null(self)
    }

    pub fn in_list<I>(self, values: I) -> Expr<bool>
    where
        I: IntoIterator,
        I::Item: IntoExpr<T>,
    {
        super::in_list(self, values)
    }

    /// COUNT(self), counting non-null values
    pub fn count(self) -> Expr<i64> {
        super::count(self)
    }

    pub fn min(self) -> Expr<T> {
        super::min(self)
    }

    pub fn max(self) -> Expr<T> {
        super::max(self)
    }
}

impl<T: super::Numeric> Expr<T> {
    pub fn sum(self) -> Expr<T> {
        super::sum(self)
    }
}

impl Expr<bool> {
    pub fn and(self, other: Expr<bool>) -> Expr<bool> {
        super::and(self, other)
    }

    pub fn or(self, other: Expr<bool>) -> Expr<bool> {
        super::or(self, other)
    }
}

impl<T: super::Textual> Expr<T> {
    pub fn like(self, pattern: impl Into<String>) -> Expr<bool> {
        super::like(self, pattern)
    }

    pub fn starts_with(self, prefix: &str) -> Expr<bool> {
        super::like(self, format!("{prefix}%"))
    }

    pub fn ends_with(self, suffix: &str) -> Expr<bool> {
        super::like(self, format!("%{suffix}"))
    }

    pub fn contains(self, needle: &str) -> Expr<bool> {
        super::like(self, format!("%{needle}%"))
    }
}
