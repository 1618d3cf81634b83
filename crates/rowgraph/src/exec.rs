use rowgraph_core::{
    driver::{Capability, Connection, Response},
    observe::Observer,
    stmt::Record,
    Result,
};
use rowgraph_sql::{stmt::Select, Serializer, Statement};

/// Serializes statements for a connection's dialect and runs them one at a
/// time, reporting each to the observer.
pub(crate) struct Exec<'a> {
    conn: &'a mut dyn Connection,
    observer: &'a dyn Observer,
    serializer: Serializer,
}

impl<'a> Exec<'a> {
    pub(crate) fn new(conn: &'a mut dyn Connection, observer: &'a dyn Observer) -> Exec<'a> {
        let serializer = Serializer::new(conn.capability().dialect);

        Exec {
            conn,
            observer,
            serializer,
        }
    }

    pub(crate) fn capability(&self) -> &'static Capability {
        self.conn.capability()
    }

    pub(crate) fn observer(&self) -> &'a dyn Observer {
        self.observer
    }

    pub(crate) async fn run(&mut self, stmt: impl Into<Statement>) -> Result<Response> {
        let mut params = vec![];
        let sql = self.serializer.serialize(&stmt.into(), &mut params);

        self.observer.statement(&sql, &params);
        self.conn.exec(&sql, &params).await
    }

    pub(crate) async fn query(&mut self, select: Select) -> Result<Vec<Record>> {
        self.run(select).await?.into_rows()
    }
}
