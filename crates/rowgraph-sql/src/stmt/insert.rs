use rowgraph_core::stmt::Value;

/// `INSERT INTO table (columns) VALUES (values) [RETURNING column]`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
    pub returning: Option<String>,
}
