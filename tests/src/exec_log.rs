use crate::logging_connection::LoggedStatement;
use rowgraph_core::stmt::Value;
use std::sync::{Arc, Mutex};

/// A wrapper around the statement log that provides a clean API for tests
pub struct ExecLog {
    statements: Arc<Mutex<Vec<LoggedStatement>>>,
}

impl ExecLog {
    pub(crate) fn new(statements: Arc<Mutex<Vec<LoggedStatement>>>) -> Self {
        Self { statements }
    }

    /// Get the number of logged statements
    pub fn len(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.statements.lock().unwrap().is_empty()
    }

    /// SQL text of every logged statement, in execution order
    pub fn sql(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|stmt| stmt.sql.clone())
            .collect()
    }

    /// Count statements whose SQL starts with `keyword`, e.g. `"INSERT"`
    pub fn count(&self, keyword: &str) -> usize {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|stmt| stmt.sql.starts_with(keyword))
            .count()
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.statements.lock().unwrap().clear();
    }

    /// Remove and return the first statement from the log
    pub fn pop(&mut self) -> Option<(String, Vec<Value>)> {
        let mut statements = self.statements.lock().unwrap();
        if statements.is_empty() {
            None
        } else {
            let stmt = statements.remove(0);
            Some((stmt.sql, stmt.params))
        }
    }
}
