use super::{connect, Db};
use crate::materialize::Mode;

use rowgraph_core::{
    bail,
    driver::Connection,
    observe::{NoopObserver, Observer},
    Result, Schema,
};

use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct Builder {
    schema: Option<Schema>,

    /// Receives events from every operation. Defaults to [`NoopObserver`].
    observer: Option<Arc<dyn Observer>>,

    mode: Mode,
}

impl Builder {
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    pub fn observer(&mut self, observer: impl Observer + 'static) -> &mut Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Whether loads return rows or mapped instances.
    pub fn materialize(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Connects with the driver selected by the URL scheme (`sqlite:` or
    /// `postgresql:`).
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        let conn = connect::connect(url).await?;
        self.build_boxed(conn)
    }

    pub fn build(&mut self, conn: impl Connection) -> Result<Db> {
        self.build_boxed(Box::new(conn))
    }

    fn build_boxed(&mut self, conn: Box<dyn Connection>) -> Result<Db> {
        let Some(schema) = self.schema.take() else {
            bail!("no schema configured");
        };

        let observer: Arc<dyn Observer> = match self.observer.take() {
            Some(observer) => observer,
            None => Arc::new(NoopObserver),
        };

        Ok(Db {
            schema: Arc::new(schema),
            conn: Mutex::new(conn),
            observer,
            mode: self.mode,
        })
    }
}
