mod exec_log;
pub use exec_log::ExecLog;

mod logging_connection;
pub use logging_connection::{LoggedStatement, LoggingConnection};

use rowgraph::{Db, Mode, Schema, TracingObserver};
use rowgraph_driver_sqlite::Sqlite;

/// `table1` references itself through a many-to-one, a one-to-many and a
/// one-to-one relationship and reaches `table2` through `table1_table2`.
/// `table3` has a key mixing a generated and a caller-assigned column.
/// `table4` (caller-assigned key) and `table5` (generated key) reference each
/// other with enforceable foreign keys.
pub fn schema() -> Schema {
    Schema::builder()
        .table("table1", |t| {
            t.column("id").primary_key().generated();
            t.column("column1");
            t.column("many_to_one_object1_id");
            t.column("one_to_one_object1_id");
            t.many_to_one("manyToOneObject1", "many_to_one_object1_id", "table1", "id");
            t.one_to_many("oneToManyObject1", "id", "table1", "many_to_one_object1_id");
            t.many_to_one("oneToOneObject1", "one_to_one_object1_id", "table1", "id")
                .other_relationship("oneToOneObject1");
            t.one_to_many("manyToManyObject2", "id", "table1_table2", "table1_id");
        })
        .table("table2", |t| {
            t.column("id").primary_key().generated();
            t.column("column1");
            t.one_to_many("manyToManyObject1", "id", "table1_table2", "table2_id");
        })
        .table("table1_table2", |t| {
            t.column("table1_id").primary_key();
            t.column("table2_id").primary_key();
            t.column("column1");
            t.many_to_one("object1", "table1_id", "table1", "id");
            t.many_to_one("object2", "table2_id", "table2", "id");
        })
        .table("table3", |t| {
            t.column("id").primary_key().generated();
            t.column("revision").primary_key();
            t.column("column1");
        })
        .table("table4", |t| {
            t.column("id").primary_key();
            t.column("column1");
            t.column("table5_id");
            t.many_to_one("object5", "table5_id", "table5", "id");
        })
        .table("table5", |t| {
            t.column("id").primary_key().generated();
            t.column("column1");
            t.column("table4_id");
            t.many_to_one("object4", "table4_id", "table4", "id");
        })
        .build()
        .expect("test schema is valid")
}

const DDL: &[&str] = &[
    "CREATE TABLE table1 (id INTEGER PRIMARY KEY, column1 TEXT, many_to_one_object1_id INTEGER, one_to_one_object1_id INTEGER)",
    "CREATE TABLE table2 (id INTEGER PRIMARY KEY, column1 TEXT)",
    "CREATE TABLE table1_table2 (table1_id INTEGER NOT NULL, table2_id INTEGER NOT NULL, column1 TEXT, PRIMARY KEY (table1_id, table2_id))",
    "CREATE TABLE table3 (id INTEGER NOT NULL, revision INTEGER NOT NULL, column1 TEXT, PRIMARY KEY (id, revision))",
    "CREATE TABLE table4 (id TEXT PRIMARY KEY, column1 TEXT, table5_id INTEGER REFERENCES table5 (id))",
    "CREATE TABLE table5 (id INTEGER PRIMARY KEY, column1 TEXT, table4_id TEXT REFERENCES table4 (id))",
];

pub struct Test {
    pub db: Db,
    pub log: ExecLog,
}

/// Opens a fresh in-memory database with the test tables created and an
/// empty statement log.
pub async fn setup() -> Test {
    setup_with(Mode::Rows).await
}

pub async fn setup_with(mode: Mode) -> Test {
    init_tracing();

    let conn = LoggingConnection::new(Sqlite::in_memory().expect("in-memory sqlite"));
    let mut log = ExecLog::new(conn.log_handle());

    let db = Db::builder()
        .schema(schema())
        .observer(TracingObserver)
        .materialize(mode)
        .build(conn)
        .expect("db builds");

    for ddl in DDL {
        db.exec(ddl, &[]).await.expect("create table");
    }

    log.clear();
    Test { db, log }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
