mod error;
pub use error::{Error, IntoError};

pub mod criteria;
pub use criteria::Criteria;

pub mod driver;
pub use driver::Connection;

pub mod graph;
pub use graph::{Graph, ObjectId};

pub mod observe;
pub use observe::Observer;

pub mod schema;
pub use schema::Schema;

pub mod stmt;
pub use stmt::{Record, Value};

/// A Result type alias that uses rowgraph's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
