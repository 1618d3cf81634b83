use pretty_assertions::assert_eq;
use rowgraph::{Graph, Mode, Value};
use serde_json::json;
use tests::setup_with;

#[tokio::test]
async fn loads_objects_keyed_by_property() {
    let t = setup_with(Mode::Instances).await;

    t.db.store_json(
        "table1",
        &json!({ "column1": "a", "manyToOneObject1": { "column1": "b" } }),
    )
    .await
    .unwrap();

    let loaded = t
        .db
        .load("table1", &json!({ "id": 2, "manyToOneObject1": { "@load": true } }))
        .await
        .unwrap();

    assert_eq!(
        loaded.graph.to_json_list(&loaded.roots),
        json!([{
            "id": 2,
            "column1": "a",
            "manyToOneObject1Id": 1,
            "oneToOneObject1Id": null,
            "manyToOneObject1": {
                "id": 1,
                "column1": "b",
                "manyToOneObject1Id": null,
                "oneToOneObject1Id": null,
            },
        }])
    );
}

#[tokio::test]
async fn store_instance_writes_keys_back() {
    let t = setup_with(Mode::Instances).await;

    let (mut graph, root) = Graph::from_json(&json!({
        "column1": "a",
        "manyToOneObject1": { "column1": "b" },
        "oneToManyObject1": [{ "column1": "c" }],
    }))
    .unwrap();

    let info = t.db.store_instance("table1", &mut graph, root).await.unwrap();
    assert_eq!(info.to_json()["id"], json!(2));

    assert_eq!(graph[root].value("id"), &Value::I64(2));
    assert_eq!(graph[root].value("manyToOneObject1Id"), &Value::I64(1));

    let parent = graph[root].one("manyToOneObject1").unwrap();
    assert_eq!(graph[parent].value("id"), &Value::I64(1));

    let child = graph[root].many("oneToManyObject1")[0];
    assert_eq!(graph[child].value("id"), &Value::I64(3));
    assert_eq!(graph[child].value("manyToOneObject1Id"), &Value::I64(2));
    assert_eq!(graph[child].get("many_to_one_object1_id"), None);
}

#[tokio::test]
async fn separately_loaded_keys_use_properties() {
    let t = setup_with(Mode::Instances).await;

    t.db.store_json(
        "table1",
        &json!({ "column1": "p", "oneToManyObject1": [{ "column1": "c" }] }),
    )
    .await
    .unwrap();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({ "id": 1, "oneToManyObject1": { "@loadSeparately": true } }),
        )
        .await
        .unwrap();

    let root = loaded.roots[0];
    let children = loaded.graph[root].many("oneToManyObject1");
    assert_eq!(children.len(), 1);
    assert_eq!(loaded.graph[children[0]].value("column1"), &Value::from("c"));
}
