mod chunk;
mod tokens;

use std::borrow::Cow;
use std::fmt::{self, Display, Write};
use std::sync::Arc;

pub use chunk::*;
use smallvec::SmallVec;
pub use tokens::*;

use crate::value::Value;

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL fragments
/// without heap allocation. Parameters are rendered as positional `?`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SQL {
    pub chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Token(t)],
        }
    }

    /// Creates SQL with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Ident(name.into())],
        }
    }

    /// Creates SQL with raw text (unquoted)
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Raw(text.into())],
        }
    }

    /// Creates SQL with a single integer literal.
    #[inline]
    pub fn number(value: i64) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Number(value)],
        }
    }

    /// Creates SQL with a single parameter value
    #[inline]
    pub fn param(value: impl Into<Value>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Param(value.into())],
        }
    }

    /// Creates SQL referencing `qualifier.name`
    #[inline]
    pub fn column(qualifier: Arc<str>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Column {
                qualifier,
                name: name.into(),
            }],
        }
    }

    /// Creates SQL for a function call: NAME(args)
    /// Subqueries are automatically wrapped in parentheses: NAME((SELECT ...))
    #[inline]
    pub fn func(name: &'static str, args: SQL) -> Self {
        let args = if args.is_subquery() {
            args.parens()
        } else {
            args
        };
        SQL::raw(name)
            .push(Token::LPAREN)
            .append(args)
            .push(Token::RPAREN)
    }

    // ==================== builder methods ====================

    /// Append another SQL fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<SQL>) -> Self {
        self.append_mut(other);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<SQL>) {
        let other = other.into();

        if self.chunks.is_empty() {
            self.chunks = other.chunks;
            return;
        }
        if other.chunks.is_empty() {
            return;
        }

        self.chunks.extend(other.chunks);
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SQLChunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn push_mut(&mut self, chunk: impl Into<SQLChunk>) {
        self.chunks.push(chunk.into());
    }

    // ==================== combinators ====================

    /// Joins multiple SQL fragments with a separator
    pub fn join<T>(sqls: T, separator: Token) -> SQL
    where
        T: IntoIterator,
        T::Item: ToSQL,
    {
        let mut iter = sqls.into_iter();
        let Some(first) = iter.next() else {
            return SQL::empty();
        };

        let mut result = first.into_sql();
        let (lower, _) = iter.size_hint();
        result.chunks.reserve(lower.saturating_mul(2));

        for item in iter {
            result.chunks.push(SQLChunk::Token(separator));
            result.chunks.extend(item.into_sql().chunks);
        }
        result
    }

    /// Wrap in parentheses: (self)
    #[inline]
    pub fn parens(self) -> Self {
        SQL::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Check if this SQL fragment is a subquery (starts with SELECT)
    #[inline]
    pub fn is_subquery(&self) -> bool {
        matches!(self.chunks.first(), Some(SQLChunk::Token(Token::SELECT)))
    }

    /// Creates an aliased version: self AS "name"
    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> SQL {
        self.push(Token::AS).push(SQLChunk::Ident(name.into()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== output methods ====================

    /// Returns the SQL string with `?` placeholders.
    pub fn sql(&self) -> String {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        self.write_to(&mut buf);
        buf
    }

    /// Generates the SQL string and collects parameter references in a single pass.
    pub fn build(&self) -> (String, SmallVec<[&Value; 8]>) {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        let mut params: SmallVec<[&Value; 8]> = SmallVec::new();
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(&mut buf);
            if let SQLChunk::Param(value) = chunk {
                params.push(value);
            }
            if self.needs_space(i) {
                buf.push(' ');
            }
        }
        (buf, params)
    }

    /// Write SQL to a buffer with `?` placeholders.
    pub fn write_to(&self, buf: &mut impl Write) {
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(buf);
            if self.needs_space(i) {
                let _ = buf.write_char(' ');
            }
        }
    }

    /// Identity of this fragment as a selection: the rendered text plus the
    /// bound parameter values. Two fragments with equal keys read the same
    /// result column.
    pub fn key(&self) -> String {
        let (mut text, params) = self.build();
        if !params.is_empty() {
            let _ = write!(text, " {params:?}");
        }
        text
    }

    fn needs_space(&self, index: usize) -> bool {
        let Some(next) = self.chunks.get(index + 1) else {
            return false;
        };

        chunk_needs_space(&self.chunks[index], next)
    }

    /// Returns an iterator over references to parameter values
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.chunks.iter().filter_map(|chunk| match chunk {
            SQLChunk::Param(value) => Some(value),
            _ => None,
        })
    }
}

/// Canonical spacing logic for SQL chunk rendering.
pub(crate) fn chunk_needs_space(current: &SQLChunk, next: &SQLChunk) -> bool {
    // No space if current raw text ends with space
    if let SQLChunk::Raw(text) = current
        && text.ends_with(' ')
    {
        return false;
    }

    match (current, next) {
        // No space before closing/separator punctuation
        (_, SQLChunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        // No space after opening punctuation
        (SQLChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // No space between a function name and its argument list
        (SQLChunk::Raw(_), SQLChunk::Token(Token::LPAREN)) => false,
        // Space after comma
        (SQLChunk::Token(Token::COMMA), _) => true,
        // Space after closing paren if next is word-like (e.g., ") FROM")
        (SQLChunk::Token(Token::RPAREN), next) => next.is_word_like(),
        // Space before opening paren if preceded by word-like (e.g., "IN (")
        (current, SQLChunk::Token(Token::LPAREN)) => current.is_word_like(),
        // Space around comparison operators
        (SQLChunk::Token(t), _) if t.is_operator() => true,
        (_, SQLChunk::Token(t)) if t.is_operator() => true,
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

/// Conversion into an owned [`SQL`] fragment.
pub trait ToSQL {
    fn to_sql(&self) -> SQL;

    fn into_sql(self) -> SQL
    where
        Self: Sized,
    {
        self.to_sql()
    }
}

// ==================== trait implementations ====================

impl From<Token> for SQL {
    fn from(value: Token) -> Self {
        SQL::token(value)
    }
}

impl Display for SQL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<_> = self.params().collect();
        write!(f, r#"sql: "{}", params: {:?}"#, self.sql(), params)
    }
}

impl ToSQL for SQL {
    fn to_sql(&self) -> SQL {
        self.clone()
    }

    fn into_sql(self) -> SQL {
        self
    }
}

impl<T: ToSQL> ToSQL for &T {
    fn to_sql(&self) -> SQL {
        (**self).to_sql()
    }
}

impl<T> FromIterator<T> for SQL
where
    SQLChunk: From<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let chunks = SmallVec::from_iter(iter.into_iter().map(SQLChunk::from));
        Self { chunks }
    }
}
