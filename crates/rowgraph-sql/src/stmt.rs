mod delete;
pub use delete::Delete;

mod expr;
pub use expr::{BinaryOp, ColumnRef, Expr};

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Join, OrderByExpr, Select, SelectItem, TableRef};

mod update;
pub use update::Update;

pub use rowgraph_core::criteria::Direction;

/// A single SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
