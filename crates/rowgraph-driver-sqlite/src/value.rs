use rowgraph_core::stmt::Value as CoreValue;
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value<'a>(&'a CoreValue);

impl<'a> From<&'a CoreValue> for Value<'a> {
    fn from(value: &'a CoreValue) -> Self {
        Self(value)
    }
}

/// Converts a SQLite value within a row to a core value.
///
/// Booleans come back as integers; SQLite has no separate storage class.
pub fn from_sql(row: &Row, index: usize) -> rusqlite::Result<CoreValue> {
    Ok(match row.get_ref(index)? {
        ValueRef::Null => CoreValue::Null,
        ValueRef::Integer(value) => CoreValue::I64(value),
        ValueRef::Real(value) => CoreValue::F64(value),
        ValueRef::Text(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
        ValueRef::Blob(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
    })
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self.0 {
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            CoreValue::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
        }
    }
}
