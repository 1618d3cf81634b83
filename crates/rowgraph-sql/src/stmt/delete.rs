use super::Expr;

/// `DELETE FROM table WHERE filter`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Expr,
}
