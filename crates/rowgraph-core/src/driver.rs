mod capability;
pub use capability::{Capability, Dialect};

mod response;
pub use response::{Mutation, Response};

use crate::{async_trait, stmt::Value, Result};

use std::fmt::Debug;

/// A database connection able to run one statement at a time.
///
/// Exactly one SELECT, INSERT, UPDATE or DELETE is passed per call to
/// [`Connection::exec`]; statements are never batched. Wrap the connection in
/// a transaction when several statements must apply atomically.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Describes the connection's SQL dialect and result shape.
    fn capability(&self) -> &'static Capability;

    /// Execute a statement with positional parameters.
    async fn exec(&mut self, sql: &str, params: &[Value]) -> Result<Response>;
}

