pub mod compile;
pub use compile::{compile, compile_into, count, Compiled, LoadSeparately};

pub mod db;
pub use db::{Db, Loaded};

mod exec;

#[cfg(test)]
mod fixture;

pub mod materialize;
pub use materialize::{unjoin, Mode};

pub mod persist;
pub use persist::{delete, store, Persist, StoreInfo, StoredRelation};

pub use rowgraph_core::{
    criteria::{validate_criteria, Issue},
    driver::{Capability, Connection, Response},
    observe::{NoopObserver, Observer, TracingObserver},
    schema::{self, Schema},
    stmt::{Record, Value},
    Criteria, Error, Graph, ObjectId, Result,
};

pub use rowgraph_sql as sql;
