use postgres::types::{private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use rowgraph_core::stmt::Value as CoreValue;
use tokio_postgres::{Column, Row};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

#[derive(Debug)]
pub struct Value<'a>(&'a CoreValue);

impl<'a> From<&'a CoreValue> for Value<'a> {
    fn from(value: &'a CoreValue) -> Self {
        Self(value)
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                Type::INT8 => value.to_sql(ty, out),
                Type::FLOAT8 => (*value as f64).to_sql(ty, out),
                _ => value.to_string().to_sql(ty, out),
            },
            CoreValue::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::String(value) => value.to_sql(ty, out),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Converts a PostgreSQL value within a row to a core value. Integer widths
/// are normalized to 64 bits.
pub fn from_sql(index: usize, row: &Row, column: &Column) -> Result<CoreValue, tokio_postgres::Error> {
    // NOTE: the PostgreSQL type enum is opaque, so each type is matched by hand.
    let ty = column.type_();

    let value = if ty == &Type::TEXT || ty == &Type::VARCHAR || ty == &Type::BPCHAR || ty == &Type::NAME {
        row.try_get::<usize, Option<String>>(index)?.map(CoreValue::String)
    } else if ty == &Type::BOOL {
        row.try_get::<usize, Option<bool>>(index)?.map(CoreValue::Bool)
    } else if ty == &Type::INT2 {
        row.try_get::<usize, Option<i16>>(index)?
            .map(|v| CoreValue::I64(v.into()))
    } else if ty == &Type::INT4 {
        row.try_get::<usize, Option<i32>>(index)?
            .map(|v| CoreValue::I64(v.into()))
    } else if ty == &Type::INT8 {
        row.try_get::<usize, Option<i64>>(index)?.map(CoreValue::I64)
    } else if ty == &Type::FLOAT4 {
        row.try_get::<usize, Option<f32>>(index)?
            .map(|v| CoreValue::F64(v.into()))
    } else {
        row.try_get::<usize, Option<f64>>(index)?.map(CoreValue::F64)
    };

    Ok(value.unwrap_or(CoreValue::Null))
}
