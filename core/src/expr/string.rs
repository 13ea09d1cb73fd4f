//! Pattern matching on textual expressions.

use crate::sql::{SQL, Token};

use super::Expr;

/// Marker for expression types holding text.
pub trait Textual {}

impl Textual for String {}
impl Textual for Option<String> {}

/// `expr LIKE pattern`.
///
/// `starts_with`, `ends_with` and `contains` on [`Expr`] build the pattern
/// for you; `%` and `_` in their argument keep their wildcard meaning.
pub fn like<T: Textual>(expr: Expr<T>, pattern: impl Into<String>) -> Expr<bool> {
    Expr::new(
        expr.into_sql()
            .push(Token::LIKE)
            .append(SQL::param(pattern.into())),
    )
}
