//! Scalar column type tags

use crate::Dialect;

/// The scalar type of a column.
///
/// Nullability is tracked on the [`ColumnDescriptor`](crate::ColumnDescriptor),
/// not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum ColumnType {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Char { length: u32 },
    VarChar { length: u32 },
    Text,
    Binary { length: Option<u32> },
    Uuid,
    Boolean,
    /// Text column restricted to a fixed set of variant names
    Enumeration { name: String, variants: Vec<String> },
}

impl ColumnType {
    /// Returns why this type cannot be mapped to SQL, if it cannot.
    pub fn unsupported_reason(&self) -> Option<&'static str> {
        match self {
            ColumnType::Decimal { precision: 0, .. } => Some("decimal precision must be positive"),
            ColumnType::Decimal { precision, scale } if scale > precision => {
                Some("decimal scale exceeds precision")
            }
            ColumnType::Char { length: 0 } | ColumnType::VarChar { length: 0 } => {
                Some("character length must be positive")
            }
            ColumnType::Binary { length: Some(0) } => Some("binary length must be positive"),
            ColumnType::Enumeration { variants, .. } if variants.is_empty() => {
                Some("enumeration declares no variants")
            }
            _ => None,
        }
    }

    /// Integer-valued types, the only ones that may auto-increment.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt
        )
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                ColumnType::Float | ColumnType::Double | ColumnType::Decimal { .. }
            )
    }

    /// SQL type name for `dialect`.
    ///
    /// ```
    /// use typeq_types::{ColumnType, Dialect};
    ///
    /// assert_eq!(ColumnType::VarChar { length: 40 }.sql_type(Dialect::PostgreSQL), "varchar(40)");
    /// assert_eq!(ColumnType::VarChar { length: 40 }.sql_type(Dialect::SQLite), "text");
    /// ```
    pub fn sql_type(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::SQLite => self.sqlite_type().to_string(),
            Dialect::PostgreSQL => self.postgres_type(),
        }
    }

    const fn sqlite_type(&self) -> &'static str {
        match self {
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Integer
            | ColumnType::BigInt
            | ColumnType::Boolean => "integer",
            ColumnType::Float | ColumnType::Double => "real",
            ColumnType::Decimal { .. } => "numeric",
            ColumnType::Char { .. }
            | ColumnType::VarChar { .. }
            | ColumnType::Text
            | ColumnType::Uuid
            | ColumnType::Enumeration { .. } => "text",
            ColumnType::Binary { .. } => "blob",
        }
    }

    fn postgres_type(&self) -> String {
        match self {
            ColumnType::TinyInt | ColumnType::SmallInt => "smallint".to_string(),
            ColumnType::Integer => "integer".to_string(),
            ColumnType::BigInt => "bigint".to_string(),
            ColumnType::Float => "real".to_string(),
            ColumnType::Double => "double precision".to_string(),
            ColumnType::Decimal { precision, scale } => format!("numeric({precision}, {scale})"),
            ColumnType::Char { length } => format!("char({length})"),
            ColumnType::VarChar { length } => format!("varchar({length})"),
            ColumnType::Text | ColumnType::Enumeration { .. } => "text".to_string(),
            ColumnType::Binary { .. } => "bytea".to_string(),
            ColumnType::Uuid => "uuid".to_string(),
            ColumnType::Boolean => "boolean".to_string(),
        }
    }
}
