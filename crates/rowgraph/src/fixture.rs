use rowgraph_core::{
    async_trait,
    driver::{Capability, Connection, Response},
    stmt::Value,
    Result, Schema,
};

use std::collections::VecDeque;

/// `table1` references itself both ways and reaches `table2` through the
/// `table1_table2` association table.
pub(crate) fn schema() -> Schema {
    Schema::builder()
        .table("table1", |t| {
            t.column("id").primary_key().generated();
            t.column("column1");
            t.column("many_to_one_object1_id");
            t.many_to_one("manyToOneObject1", "many_to_one_object1_id", "table1", "id");
            t.one_to_many("oneToManyObject1", "id", "table1", "many_to_one_object1_id");
            t.one_to_many("manyToManyObject2", "id", "table1_table2", "table1_id");
        })
        .table("table2", |t| {
            t.column("id").primary_key().generated();
            t.column("column1");
        })
        .table("table1_table2", |t| {
            t.column("table1_id").primary_key();
            t.column("table2_id").primary_key();
            t.column("column1");
            t.many_to_one("object1", "table1_id", "table1", "id");
            t.many_to_one("object2", "table2_id", "table2", "id");
        })
        .build()
        .expect("fixture schema is valid")
}

pub(crate) fn sql(select: impl Into<rowgraph_sql::Statement>) -> (String, Vec<Value>) {
    let mut params = vec![];
    let sql = rowgraph_sql::Serializer::sqlite().serialize(&select.into(), &mut params);
    (sql, params)
}

/// Replays canned responses and records every statement it receives.
#[derive(Debug)]
pub(crate) struct Scripted {
    pub(crate) capability: &'static Capability,
    pub(crate) responses: VecDeque<Response>,
    pub(crate) log: Vec<(String, Vec<Value>)>,
}

impl Scripted {
    pub(crate) fn new(capability: &'static Capability, responses: Vec<Response>) -> Scripted {
        Scripted {
            capability,
            responses: responses.into(),
            log: vec![],
        }
    }

    pub(crate) fn statements(&self) -> Vec<&str> {
        self.log.iter().map(|(sql, _)| sql.as_str()).collect()
    }
}

#[async_trait]
impl Connection for Scripted {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn exec(&mut self, sql: &str, params: &[Value]) -> Result<Response> {
        self.log.push((sql.to_string(), params.to_vec()));
        Ok(self
            .responses
            .pop_front()
            .unwrap_or_else(|| panic!("no response scripted for `{sql}`")))
    }
}
