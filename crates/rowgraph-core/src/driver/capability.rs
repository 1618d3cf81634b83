/// Describes what a connection speaks and how it reports writes.
#[derive(Debug)]
pub struct Capability {
    /// SQL dialect used when serializing statements.
    pub dialect: Dialect,

    /// When true, an INSERT must carry `RETURNING <column>` for the generated
    /// key to be reported back.
    pub returning_generated_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        returning_generated_key: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        dialect: Dialect::Postgresql,
        returning_generated_key: true,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        dialect: Dialect::Mysql,
        ..Self::SQLITE
    };
}
