use rowgraph_core::{
    criteria::{ColumnFilter, Comparison, FilterEntry, Operand, Operator},
    stmt::Value,
};
use rowgraph_sql::stmt::{BinaryOp, Expr};

use super::Terms;

/// Translates the filter on one column. Comparisons that cannot be compiled
/// are dropped; they are reported by validation instead.
pub(super) fn column_filter(alias: &str, column: &str, filter: &ColumnFilter) -> Option<Expr> {
    let lhs = || Expr::column(alias, column);

    match filter {
        ColumnFilter::Comparison(comparison) => self::comparison(lhs(), comparison),
        ColumnFilter::List(values) => Some(Expr::in_list(lhs(), values.clone(), false)),
        ColumnFilter::Group(entries) => {
            let mut terms = Terms::default();

            for entry in entries {
                match entry {
                    FilterEntry::Connective(connective) => terms.connective(*connective),
                    FilterEntry::Comparison(comparison) => {
                        if let Some(expr) = self::comparison(lhs(), comparison) {
                            terms.push(expr);
                        }
                    }
                    FilterEntry::Invalid(_) => {}
                }
            }

            terms.finish()
        }
    }
}

fn comparison(lhs: Expr, comparison: &Comparison) -> Option<Expr> {
    if comparison.problem().is_some() {
        return None;
    }

    let expr = match (&comparison.operator, &comparison.operand) {
        (Operator::Eq | Operator::In, Operand::List(list)) => {
            Expr::in_list(lhs, list.clone(), false)
        }
        (Operator::Ne | Operator::NotIn, Operand::List(list)) => {
            Expr::in_list(lhs, list.clone(), true)
        }
        (Operator::In, Operand::Value(value)) => Expr::in_list(lhs, vec![value.clone()], false),
        (Operator::NotIn, Operand::Value(value)) => Expr::in_list(lhs, vec![value.clone()], true),
        (Operator::Eq, Operand::Value(Value::Null)) => Expr::is_null(lhs, false),
        (Operator::Ne, Operand::Value(Value::Null)) => Expr::is_null(lhs, true),
        (op, Operand::Value(value)) => match op {
            Operator::Like => like(lhs, value, false, false),
            Operator::NotLike => like(lhs, value, false, true),
            Operator::ILike => like(lhs, value, true, false),
            Operator::NotILike => like(lhs, value, true, true),
            op => Expr::binary_op(lhs, binary_op(op)?, Expr::value(value.clone())),
        },
        _ => return None,
    };

    Some(if comparison.negate {
        Expr::not(expr)
    } else {
        expr
    })
}

fn like(lhs: Expr, pattern: &Value, case_insensitive: bool, negate: bool) -> Expr {
    Expr::Like {
        expr: Box::new(lhs),
        pattern: pattern.clone(),
        case_insensitive,
        negate,
    }
}

fn binary_op(op: &Operator) -> Option<BinaryOp> {
    Some(match op {
        Operator::Eq => BinaryOp::Eq,
        Operator::Ne => BinaryOp::Ne,
        Operator::Gt => BinaryOp::Gt,
        Operator::Ge => BinaryOp::Ge,
        Operator::Lt => BinaryOp::Lt,
        Operator::Le => BinaryOp::Le,
        _ => return None,
    })
}
