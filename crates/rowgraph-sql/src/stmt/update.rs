use super::Expr;
use rowgraph_core::stmt::Value;

/// `UPDATE table SET column = value, ... WHERE filter`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub filter: Expr,
}
