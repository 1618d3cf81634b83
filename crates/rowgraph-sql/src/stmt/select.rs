use super::{ColumnRef, Direction, Expr};

/// `SELECT ... FROM ... LEFT JOIN ... WHERE ... ORDER BY ... LIMIT ... OFFSET ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<SelectItem>,
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `alias.column AS label`
    Column {
        column: ColumnRef,
        label: Option<String>,
    },

    /// `COUNT(*)`, or `COUNT(DISTINCT column)`
    Count {
        distinct: Option<ColumnRef>,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

/// `LEFT JOIN name alias ON ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Direction,
}

impl Select {
    /// Selects nothing yet from `name AS alias`.
    pub fn from(name: impl Into<String>, alias: impl Into<String>) -> Select {
        Select {
            columns: vec![],
            from: TableRef {
                name: name.into(),
                alias: Some(alias.into()),
            },
            joins: vec![],
            filter: None,
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    /// ANDs `expr` onto the WHERE clause.
    pub fn and_filter(&mut self, expr: Expr) {
        self.filter = match self.filter.take() {
            None => Some(expr),
            Some(Expr::And(mut operands)) => {
                operands.push(expr);
                Some(Expr::And(operands))
            }
            Some(existing) => Some(Expr::And(vec![existing, expr])),
        };
    }

    /// True if a join with this alias is already present.
    pub fn has_join(&self, alias: &str) -> bool {
        self.joins
            .iter()
            .any(|join| join.table.alias.as_deref() == Some(alias))
    }
}
