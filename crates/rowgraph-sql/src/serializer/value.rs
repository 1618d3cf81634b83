use super::{Params, ToSql};

use rowgraph_core::stmt::Value;

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let placeholder = f.params.push(self);
        fmt!(f, placeholder);
    }
}
