use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

use crate::sql::tokens::Token;
use crate::value::Value;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers ("table_name")
/// - `Raw` - Unquoted raw SQL text (function names)
/// - `Number` - Unsigned integer literal (LIMIT/OFFSET)
/// - `Param` - Positional parameter with its bound value
/// - `Column` - Qualified column reference ("qualifier"."column")
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk {
    /// SQL keywords and operators: SELECT, FROM, WHERE, =, AND, etc.
    Token(Token),

    /// Quoted identifier, renders as: "name"
    Ident(Cow<'static, str>),

    /// Raw SQL text, renders as-is
    Raw(Cow<'static, str>),

    /// Signed integer literal, renders as-is
    Number(i64),

    /// Parameter value, renders as: ?
    Param(Value),

    /// Column under a table name or alias, renders as: "qualifier"."name"
    Column {
        qualifier: Arc<str>,
        name: Cow<'static, str>,
    },
}

impl SQLChunk {
    pub(crate) fn write(&self, buf: &mut impl Write) {
        match self {
            SQLChunk::Token(token) => {
                let _ = buf.write_str(token.as_str());
            }
            SQLChunk::Ident(name) => write_ident(buf, name),
            SQLChunk::Raw(text) => {
                let _ = buf.write_str(text);
            }
            SQLChunk::Number(n) => {
                let _ = write!(buf, "{n}");
            }
            SQLChunk::Param(_) => {
                let _ = buf.write_char('?');
            }
            SQLChunk::Column { qualifier, name } => {
                write_ident(buf, qualifier);
                let _ = buf.write_char('.');
                write_ident(buf, name);
            }
        }
    }

    /// Check if this chunk is "word-like" (needs space separation from other word-like chunks)
    #[inline]
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => !matches!(
                t,
                Token::LPAREN
                    | Token::RPAREN
                    | Token::COMMA
                    | Token::DOT
                    | Token::EQ
                    | Token::NE
                    | Token::LT
                    | Token::GT
                    | Token::LE
                    | Token::GE
            ),
            SQLChunk::Ident(_)
            | SQLChunk::Raw(_)
            | SQLChunk::Number(_)
            | SQLChunk::Param(_)
            | SQLChunk::Column { .. } => true,
        }
    }
}

/// Quote an identifier, doubling embedded quotes.
fn write_ident(buf: &mut impl Write, name: &str) {
    let _ = buf.write_char('"');
    for ch in name.chars() {
        if ch == '"' {
            let _ = buf.write_char('"');
        }
        let _ = buf.write_char(ch);
    }
    let _ = buf.write_char('"');
}

impl From<Token> for SQLChunk {
    #[inline]
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl From<Value> for SQLChunk {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Param(value)
    }
}
