//! Conversions between typeq values and rusqlite values.

use typeq_core::Value;

/// Borrowed typeq value bound as a rusqlite parameter.
#[derive(Debug, Clone, Copy)]
pub struct SqliteParam<'a>(pub &'a Value);

#[cfg(feature = "rusqlite")]
impl rusqlite::ToSql for SqliteParam<'_> {
    fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
        match self.0 {
            Value::Null => Ok(rusqlite::types::ToSqlOutput::Owned(
                rusqlite::types::Value::Null,
            )),
            Value::Integer(i) => Ok(rusqlite::types::ToSqlOutput::Owned(
                rusqlite::types::Value::Integer(*i),
            )),
            Value::Real(f) => Ok(rusqlite::types::ToSqlOutput::Owned(
                rusqlite::types::Value::Real(*f),
            )),
            Value::Text(s) => Ok(rusqlite::types::ToSqlOutput::Borrowed(
                rusqlite::types::ValueRef::Text(s.as_bytes()),
            )),
            Value::Blob(b) => Ok(rusqlite::types::ToSqlOutput::Borrowed(
                rusqlite::types::ValueRef::Blob(b.as_ref()),
            )),
        }
    }
}

/// Owned typeq value read from a result column.
#[cfg(feature = "rusqlite")]
pub fn from_value_ref(value: rusqlite::types::ValueRef<'_>) -> Value {
    match value {
        rusqlite::types::ValueRef::Null => Value::Null,
        rusqlite::types::ValueRef::Integer(i) => Value::Integer(i),
        rusqlite::types::ValueRef::Real(r) => Value::Real(r),
        rusqlite::types::ValueRef::Text(items) => {
            Value::Text(String::from_utf8_lossy(items).into_owned())
        }
        rusqlite::types::ValueRef::Blob(items) => Value::Blob(items.into()),
    }
}
