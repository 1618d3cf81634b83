use super::{Comma, Ident, Operands, Params, ToSql};

use crate::stmt;

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            Column(column) => fmt!(f, column),
            Value(value) => fmt!(f, value),
            Literal(true) => fmt!(f, "TRUE"),
            Literal(false) => fmt!(f, "FALSE"),
            BinaryOp { lhs, op, rhs } => {
                fmt!(f, &**lhs, " ", *op, " ", &**rhs);
            }
            And(operands) => fmt!(f, Operands(operands, " AND ")),
            Or(operands) => fmt!(f, Operands(operands, " OR ")),
            Xor(operands) if f.serializer.is_mysql() => {
                fmt!(f, Operands(operands, " XOR "))
            }
            Xor(operands) => {
                // Boolean inequality is parity; bracket every operand so `<>`
                // does not bind to a comparison inside it.
                let mut s = "";
                for operand in operands {
                    fmt!(f, s, "(", operand, ")");
                    s = " <> ";
                }
            }
            Not(expr) => fmt!(f, "NOT (", &**expr, ")"),
            IsNull { expr, negate } => {
                let op = if *negate { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, &**expr, op);
            }
            InList { list, negate, .. } if list.is_empty() => {
                let literal = if *negate { "TRUE" } else { "FALSE" };
                fmt!(f, literal);
            }
            InList { expr, list, negate } => {
                let op = if *negate { " NOT IN (" } else { " IN (" };
                fmt!(f, &**expr, op, Comma(list), ")");
            }
            Like {
                expr,
                pattern,
                case_insensitive,
                negate,
            } => {
                let not = if *negate { " NOT" } else { "" };

                match (*case_insensitive, f.serializer.is_postgresql()) {
                    (false, _) => fmt!(f, &**expr, not, " LIKE ", pattern),
                    (true, true) => fmt!(f, &**expr, not, " ILIKE ", pattern),
                    (true, false) => {
                        fmt!(f, "LOWER(", &**expr, ")", not, " LIKE LOWER(", pattern, ")")
                    }
                }
            }
        }
    }
}

impl ToSql for &stmt::ColumnRef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table), ".");
        }
        fmt!(f, Ident(&self.column));
    }
}

impl ToSql for stmt::BinaryOp {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        f.dst.push_str(match self {
            stmt::BinaryOp::Eq => "=",
            stmt::BinaryOp::Gt => ">",
            stmt::BinaryOp::Ge => ">=",
            stmt::BinaryOp::Lt => "<",
            stmt::BinaryOp::Le => "<=",
            stmt::BinaryOp::Ne => "<>",
        })
    }
}
