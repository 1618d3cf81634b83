use super::{Flavor, Formatter, ToSql};

use rowgraph_core::stmt::Value;

/// Collects bound values while a statement is serialized.
pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// The 1-based position of a bound value.
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match f.serializer.flavor {
            Flavor::Mysql => f.dst.push('?'),
            Flavor::Postgresql => f.dst.push_str(&format!("${}", self.0)),
            Flavor::Sqlite => f.dst.push_str(&format!("?{}", self.0)),
        }
    }
}
