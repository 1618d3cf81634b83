use rowgraph_core::stmt::Value;

/// A boolean or scalar SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `alias.column`, or a bare column when no alias is given
    Column(ColumnRef),

    /// Bound as a positional parameter
    Value(Value),

    /// `TRUE` / `FALSE`, written inline
    Literal(bool),

    BinaryOp {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },

    And(Vec<Expr>),
    Or(Vec<Expr>),

    /// Odd parity of the operands
    Xor(Vec<Expr>),

    Not(Box<Expr>),

    IsNull {
        expr: Box<Expr>,
        negate: bool,
    },

    InList {
        expr: Box<Expr>,
        list: Vec<Value>,
        negate: bool,
    },

    Like {
        expr: Box<Expr>,
        pattern: Value,
        case_insensitive: bool,
        negate: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Expr {
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Expr {
        Expr::Column(ColumnRef {
            table: Some(table.into()),
            column: column.into(),
        })
    }

    /// A column of the statement's only table.
    pub fn bare_column(column: impl Into<String>) -> Expr {
        Expr::Column(ColumnRef {
            table: None,
            column: column.into(),
        })
    }

    pub fn value(value: impl Into<Value>) -> Expr {
        Expr::Value(value.into())
    }

    pub fn binary_op(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        Expr::BinaryOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn is_null(expr: Expr, negate: bool) -> Expr {
        Expr::IsNull {
            expr: Box::new(expr),
            negate,
        }
    }

    pub fn in_list(expr: Expr, list: Vec<Value>, negate: bool) -> Expr {
        Expr::InList {
            expr: Box::new(expr),
            list,
            negate,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Expr {
        Expr::Not(Box::new(expr))
    }

    /// Conjunction of `operands`, collapsed when there are fewer than two.
    /// Returns `None` for an empty list.
    pub fn and_from_vec(operands: Vec<Expr>) -> Option<Expr> {
        Self::collapse(operands, Expr::And)
    }

    pub fn or_from_vec(operands: Vec<Expr>) -> Option<Expr> {
        Self::collapse(operands, Expr::Or)
    }

    pub fn xor_from_vec(operands: Vec<Expr>) -> Option<Expr> {
        Self::collapse(operands, Expr::Xor)
    }

    fn collapse(mut operands: Vec<Expr>, f: fn(Vec<Expr>) -> Expr) -> Option<Expr> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(f(operands)),
        }
    }

    /// True for expressions that need brackets when nested in another
    /// boolean operator.
    pub fn is_compound(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_) | Expr::Xor(_))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}
