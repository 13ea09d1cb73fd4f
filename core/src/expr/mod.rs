//! Typed SQL expressions.
//!
//! [`Expr<T>`] wraps a [`SQL`](crate::SQL) fragment together with the Rust type
//! `T` its result decodes to. Operators are available both as free functions
//! (`eq(left, right)`) and as methods (`left.eq(right)`).

mod agg;
mod cmp;
mod logical;
mod string;
mod typed;

pub use agg::*;
pub use cmp::*;
pub use logical::*;
pub use string::*;
pub use typed::*;
