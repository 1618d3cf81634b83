use rowgraph_core::{
    async_trait,
    driver::{Capability, Connection, Response},
    stmt::Value,
    Result,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct LoggedStatement {
    pub sql: String,
    pub params: Vec<Value>,
    pub response: Response,
}

/// A connection wrapper that logs every statement it executes, for testing
/// purposes
#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes statements
    inner: Box<dyn Connection>,

    /// Shared with the [`ExecLog`](crate::ExecLog) handed to the test
    log: Arc<Mutex<Vec<LoggedStatement>>>,
}

impl LoggingConnection {
    pub fn new(inner: impl Connection) -> Self {
        Self {
            inner: Box::new(inner),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the statement log
    pub fn log_handle(&self) -> Arc<Mutex<Vec<LoggedStatement>>> {
        self.log.clone()
    }
}

#[async_trait]
impl Connection for LoggingConnection {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn exec(&mut self, sql: &str, params: &[Value]) -> Result<Response> {
        let response = self.inner.exec(sql, params).await?;

        self.log
            .lock()
            .expect("Failed to acquire statement log lock")
            .push(LoggedStatement {
                sql: sql.to_string(),
                params: params.to_vec(),
                response: response.clone(),
            });

        Ok(response)
    }
}
