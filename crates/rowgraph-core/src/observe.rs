//! Hooks for watching the compiler, materializer and persistence engine.
//!
//! The algorithms never log on their own. They report to an [`Observer`],
//! which defaults to [`NoopObserver`]. Use [`TracingObserver`] to forward
//! every event to `tracing`.

use crate::stmt::{Record, Value};

use std::fmt::Debug;

/// Receives events from rowgraph operations. Every method defaults to a no-op.
pub trait Observer: Debug + Send + Sync {
    /// A statement is about to be executed.
    fn statement(&self, sql: &str, params: &[Value]) {
        let _ = (sql, params);
    }

    /// The persistence engine decided how to write a row.
    fn write_decision(&self, table: &str, row: &Record, update: bool) {
        let _ = (table, row, update);
    }

    /// A foreign key could not be set before writing because its target is
    /// still being written; it is patched once the target is stored.
    fn deferred_patch(&self, table: &str, relationship: &str) {
        let _ = (table, relationship);
    }

    /// Flat rows were materialized into entities of `table`.
    fn materialized(&self, table: &str, rows: usize, entities: usize) {
        let _ = (table, rows, entities);
    }

    /// A relationship is loaded with an additional query.
    fn load_separately(&self, table: &str, path: &str) {
        let _ = (table, path);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Forwards events to `tracing` at debug and trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn statement(&self, sql: &str, params: &[Value]) {
        tracing::debug!(sql, params = ?params, "executing statement");
    }

    fn write_decision(&self, table: &str, row: &Record, update: bool) {
        tracing::debug!(table, update, row = ?row, "writing row");
    }

    fn deferred_patch(&self, table: &str, relationship: &str) {
        tracing::debug!(table, relationship, "deferring foreign key patch");
    }

    fn materialized(&self, table: &str, rows: usize, entities: usize) {
        tracing::trace!(table, rows, entities, "materialized rows");
    }

    fn load_separately(&self, table: &str, path: &str) {
        tracing::debug!(table, path, "loading relationship separately");
    }
}
