use super::{Formatter, Params, ToSql};

use crate::stmt::Expr;

/// Comma delimited
pub(super) struct Comma<L>(pub(super) L);

/// Boolean operands joined by an operator, bracketing compound operands
pub(super) struct Operands<'a>(pub(super) &'a [Expr], pub(super) &'static str);

impl<L> ToSql for Comma<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut s = "";
        for i in self.0 {
            fmt!(f, s, i);
            s = ", ";
        }
    }
}

impl ToSql for Operands<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut s = "";
        for operand in self.0 {
            fmt!(f, s);
            if operand.is_compound() {
                fmt!(f, "(", operand, ")");
            } else {
                fmt!(f, operand);
            }
            s = self.1;
        }
    }
}
