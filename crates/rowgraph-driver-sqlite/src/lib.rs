mod value;
use value::Value;

use rowgraph_core::{
    async_trait,
    driver::{Capability, Connection, Response},
    stmt::{Record, Value as CoreValue},
    Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::path::Path;
use url::Url;

/// A SQLite connection.
#[derive(Debug)]
pub struct Sqlite {
    connection: RusqliteConnection,
}

impl Sqlite {
    /// Opens a connection from a `sqlite:` URL. `sqlite::memory:` opens a
    /// fresh in-memory database.
    pub fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(anyhow::Error::from)?;

        if url.scheme() != "sqlite" {
            return Err(anyhow::anyhow!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url
            )
            .into());
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    /// Opens an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self { connection })
    }

    /// Opens the database file at `path`, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self { connection })
    }
}

impl From<RusqliteConnection> for Sqlite {
    fn from(connection: RusqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Connection for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn exec(&mut self, sql: &str, params: &[CoreValue]) -> Result<Response> {
        tracing::debug!(sql, params = params.len(), "sqlite exec");

        let mut stmt = self.connection.prepare_cached(sql).map_err(Error::driver)?;
        let params = rusqlite::params_from_iter(params.iter().map(Value::from));

        // Statements without result columns report an affected row count
        if stmt.column_count() == 0 {
            let affected_rows = stmt.execute(params).map_err(Error::driver)?;

            return Ok(Response::AffectedRows {
                affected_rows: affected_rows as u64,
                insert_id: Some(CoreValue::I64(self.connection.last_insert_rowid())),
            });
        }

        let names = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = stmt.query(params).map_err(Error::driver)?;
        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut record = Record::with_capacity(names.len());

            for (index, name) in names.iter().enumerate() {
                record.insert(name.clone(), value::from_sql(row, index).map_err(Error::driver)?);
            }

            ret.push(record);
        }

        Ok(Response::rows(ret))
    }
}
