//! Database dialect enum

use core::fmt;
use core::str::FromStr;

/// SQL dialect for database-specific rendering
///
/// The query engine itself renders dialect-neutral SQL with `?` placeholders.
/// The dialect matters for type names and schema DDL.
///
/// # Examples
///
/// ```
/// use typeq_types::Dialect;
///
/// assert_eq!(Dialect::parse("postgres"), Some(Dialect::PostgreSQL));
/// assert!(!Dialect::SQLite.supports_alter_column());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// SQLite - `?` placeholders, table recreation for column changes
    #[default]
    SQLite,

    /// PostgreSQL - `ALTER TABLE ... ALTER COLUMN` for column changes
    PostgreSQL,
}

impl Dialect {
    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Accepts `"sqlite"`, `"postgresql"`, `"postgres"` and `"pg"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("sqlite") {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else {
            None
        }
    }

    /// Returns `true` if columns can be altered in place.
    ///
    /// SQLite cannot change nullability, defaults or auto-increment of an
    /// existing column, so those changes rebuild the table.
    #[inline]
    #[must_use]
    pub const fn supports_alter_column(&self) -> bool {
        matches!(self, Dialect::PostgreSQL)
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown dialect name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}`")]
pub struct DialectParseError(pub String);

impl FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or_else(|| DialectParseError(s.to_string()))
    }
}
