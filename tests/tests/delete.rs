use pretty_assertions::assert_eq;
use rowgraph::{Graph, Value};
use serde_json::json;
use tests::setup;

#[tokio::test]
async fn children_are_deleted_before_their_parent() {
    let mut t = setup().await;

    let (mut graph, root) = Graph::from_json(&json!({
        "column1": "p",
        "oneToManyObject1": [{ "column1": "a" }, { "column1": "b" }],
    }))
    .unwrap();
    t.db.store("table1", &mut graph, root).await.unwrap();
    t.log.clear();

    let deleted = t.db.delete("table1", &graph, root).await.unwrap();
    assert_eq!(deleted, 3);

    let keys: Vec<_> = std::iter::from_fn(|| t.log.pop())
        .map(|(sql, params)| {
            assert_eq!(sql, r#"DELETE FROM "table1" WHERE "id" = ?1"#);
            params
        })
        .collect();
    assert_eq!(
        keys,
        vec![vec![Value::I64(2)], vec![Value::I64(3)], vec![Value::I64(1)]]
    );

    assert_eq!(t.db.count("table1", &json!({})).await.unwrap(), 0);
}

#[tokio::test]
async fn shared_object_is_deleted_once() {
    let t = setup().await;

    let (mut graph, root) = Graph::from_json(&json!({
        "column1": "p",
        "oneToManyObject1": [{ "column1": "a" }],
    }))
    .unwrap();
    let child = graph[root].many("oneToManyObject1")[0];
    graph.push_many(root, "oneToManyObject1", child);

    t.db.store("table1", &mut graph, root).await.unwrap();

    let deleted = t.db.delete("table1", &graph, root).await.unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn deleting_a_missing_row_fails() {
    let t = setup().await;

    let (graph, root) = Graph::from_json(&json!({ "id": 9 })).unwrap();
    let err = t.db.delete("table1", &graph, root).await.unwrap_err();

    assert!(err.is_invalid_record_count());
}

#[tokio::test]
async fn deleting_without_a_key_fails_before_sql() {
    let t = setup().await;

    let (graph, root) = Graph::from_json(&json!({ "column1": "unsaved" })).unwrap();
    assert!(t.db.delete("table1", &graph, root).await.is_err());
    assert!(t.log.is_empty());
}
