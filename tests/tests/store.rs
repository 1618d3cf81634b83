use pretty_assertions::assert_eq;
use rowgraph::{Graph, Record, Value};
use serde_json::json;
use tests::setup;

async fn rows(db: &rowgraph::Db, sql: &str) -> Vec<Record> {
    db.exec(sql, &[]).await.unwrap().into_rows().unwrap()
}

fn record(values: &[(&str, Value)]) -> Record {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[tokio::test]
async fn many_to_one_target_is_inserted_first() {
    let mut t = setup().await;

    let info = t
        .db
        .store_json(
            "table1",
            &json!({ "column1": "a", "manyToOneObject1": { "column1": "b" } }),
        )
        .await
        .unwrap();

    assert_eq!(
        info.to_json(),
        json!({
            "id": 2,
            "@update": false,
            "manyToOneObject1": { "id": 1, "@update": false },
        })
    );

    assert_eq!(
        t.log.pop(),
        Some((
            r#"INSERT INTO "table1" ("column1") VALUES (?1)"#.to_string(),
            vec![Value::from("b")]
        ))
    );
    assert_eq!(
        t.log.pop(),
        Some((
            r#"INSERT INTO "table1" ("column1", "many_to_one_object1_id") VALUES (?1, ?2)"#
                .to_string(),
            vec![Value::from("a"), Value::I64(1)]
        ))
    );
    assert!(t.log.is_empty());

    assert_eq!(
        rows(&t.db, "SELECT id, column1, many_to_one_object1_id FROM table1 ORDER BY id").await,
        vec![
            record(&[
                ("id", Value::I64(1)),
                ("column1", Value::from("b")),
                ("many_to_one_object1_id", Value::Null),
            ]),
            record(&[
                ("id", Value::I64(2)),
                ("column1", Value::from("a")),
                ("many_to_one_object1_id", Value::I64(1)),
            ]),
        ]
    );
}

#[tokio::test]
async fn restoring_a_stored_graph_only_updates() {
    let mut t = setup().await;

    let (mut graph, root) = Graph::from_json(&json!({
        "column1": "a",
        "manyToOneObject1": { "column1": "b" },
        "oneToManyObject1": [{ "column1": "c" }],
    }))
    .unwrap();

    t.db.store("table1", &mut graph, root).await.unwrap();
    assert_eq!(t.log.count("INSERT"), 3);
    t.log.clear();

    graph[root].set("column1", "a2");
    let info = t.db.store("table1", &mut graph, root).await.unwrap();

    assert_eq!(t.log.count("INSERT"), 0);
    assert_eq!(t.log.count("UPDATE"), 3);
    assert_eq!(
        info.to_json(),
        json!({
            "id": 2,
            "@update": true,
            "manyToOneObject1": { "id": 1, "@update": true },
            "oneToManyObject1": [{ "id": 3, "@update": true }],
        })
    );

    assert_eq!(
        t.db.count("table1", &json!({})).await.unwrap(),
        3
    );
    assert_eq!(
        t.db.count("table1", &json!({ "column1": "a2" })).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn children_reference_their_parent() {
    let t = setup().await;

    let (mut graph, root) = Graph::from_json(&json!({
        "column1": "parent",
        "oneToManyObject1": [{ "column1": "c1" }, { "column1": "c2" }],
    }))
    .unwrap();

    let info = t.db.store("table1", &mut graph, root).await.unwrap();
    assert_eq!(
        info.to_json(),
        json!({
            "id": 1,
            "@update": false,
            "oneToManyObject1": [
                { "id": 2, "@update": false },
                { "id": 3, "@update": false },
            ],
        })
    );

    for child in graph[root].many("oneToManyObject1") {
        assert_eq!(graph[*child].value("many_to_one_object1_id"), &Value::I64(1));
    }

    assert_eq!(
        rows(&t.db, "SELECT id FROM table1 WHERE many_to_one_object1_id = 1 ORDER BY id").await,
        vec![
            record(&[("id", Value::I64(2))]),
            record(&[("id", Value::I64(3))]),
        ]
    );
}

#[tokio::test]
async fn self_referencing_one_to_one_is_written_once() {
    let mut t = setup().await;

    let mut graph = Graph::new();
    let root = graph.add(record(&[("column1", Value::from("self"))]));
    graph.set_one(root, "oneToOneObject1", Some(root));

    let info = t.db.store("table1", &mut graph, root).await.unwrap();

    assert_eq!(info.to_json(), json!({ "id": 1, "@update": false }));
    assert_eq!(t.log.count("INSERT"), 1);
    assert_eq!(t.log.count("UPDATE"), 1);
    assert_eq!(graph[root].value("one_to_one_object1_id"), &Value::I64(1));

    assert_eq!(
        rows(&t.db, "SELECT id, one_to_one_object1_id FROM table1").await,
        vec![record(&[
            ("id", Value::I64(1)),
            ("one_to_one_object1_id", Value::I64(1)),
        ])]
    );
}

#[tokio::test]
async fn mutual_one_to_one_links_both_rows() {
    let mut t = setup().await;

    let mut graph = Graph::new();
    let a = graph.add(record(&[("column1", Value::from("a"))]));
    let b = graph.add(record(&[("column1", Value::from("b"))]));
    graph.set_one(a, "oneToOneObject1", Some(b));
    graph.set_one(b, "oneToOneObject1", Some(a));

    t.db.store("table1", &mut graph, a).await.unwrap();

    assert_eq!(t.log.count("INSERT"), 2);
    assert_eq!(t.log.count("UPDATE"), 1);

    assert_eq!(
        rows(&t.db, "SELECT id, column1, one_to_one_object1_id FROM table1 ORDER BY id").await,
        vec![
            record(&[
                ("id", Value::I64(1)),
                ("column1", Value::from("b")),
                ("one_to_one_object1_id", Value::I64(2)),
            ]),
            record(&[
                ("id", Value::I64(2)),
                ("column1", Value::from("a")),
                ("one_to_one_object1_id", Value::I64(1)),
            ]),
        ]
    );
}

#[tokio::test]
async fn association_row_is_looked_up_by_its_key() {
    let mut t = setup().await;

    let link = json!({
        "column1": "x",
        "object1": { "column1": "a" },
        "object2": { "column1": "b" },
    });

    let info = t.db.store_json("table1_table2", &link).await.unwrap();
    assert_eq!(
        info.to_json(),
        json!({
            "table1_id": 1,
            "table2_id": 1,
            "@update": false,
            "object1": { "id": 1, "@update": false },
            "object2": { "id": 1, "@update": false },
        })
    );
    assert_eq!(
        t.log.sql()[2],
        r#"SELECT COUNT(*) AS "count" FROM "table1_table2" WHERE "table1_id" = ?1 AND "table2_id" = ?2"#
    );
    t.log.clear();

    let info = t
        .db
        .store_json(
            "table1_table2",
            &json!({ "table1_id": 1, "table2_id": 1, "column1": "y" }),
        )
        .await
        .unwrap();

    assert_eq!(
        info.to_json(),
        json!({ "table1_id": 1, "table2_id": 1, "@update": true })
    );
    assert_eq!(t.log.count("UPDATE"), 1);
    assert_eq!(t.log.count("INSERT"), 0);
}

#[tokio::test]
async fn mixed_key_without_generated_part_fails_before_sql() {
    let t = setup().await;

    let err = t
        .db
        .store_json("table3", &json!({ "revision": 1, "column1": "x" }))
        .await
        .unwrap_err();

    assert!(err.is_inconsistent_primary_key());
    assert!(t.log.is_empty());
}

#[tokio::test]
async fn update_of_missing_row_fails() {
    let t = setup().await;

    let err = t
        .db
        .store_json("table1", &json!({ "id": 42, "column1": "gone" }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_record_count());
}

#[tokio::test]
async fn unknown_table_is_reported() {
    let t = setup().await;
    let err = t.db.store_json("nope", &json!({})).await.unwrap_err();
    assert!(err.is_unknown_table());
}

async fn enforce_foreign_keys(t: &mut tests::Test) {
    t.db.exec("PRAGMA foreign_keys = ON", &[]).await.unwrap();
    t.log.clear();
}

#[tokio::test]
async fn caller_keyed_cycle_defers_the_reference_to_it() {
    let mut t = setup().await;
    enforce_foreign_keys(&mut t).await;

    let mut graph = Graph::new();
    let a = graph.add(record(&[("id", Value::from("x")), ("column1", Value::from("a"))]));
    let b = graph.add(record(&[("column1", Value::from("b"))]));
    graph.set_one(a, "object5", Some(b));
    graph.set_one(b, "object4", Some(a));

    let info = t.db.store("table4", &mut graph, a).await.unwrap();

    assert_eq!(
        info.to_json(),
        json!({ "id": "x", "@update": false, "object5": { "id": 1, "@update": false } })
    );

    assert_eq!(
        t.log.pop(),
        Some((
            r#"INSERT INTO "table5" ("column1") VALUES (?1)"#.to_string(),
            vec![Value::from("b")]
        ))
    );
    assert_eq!(
        t.log.pop(),
        Some((
            r#"SELECT COUNT(*) AS "count" FROM "table4" WHERE "id" = ?1"#.to_string(),
            vec![Value::from("x")]
        ))
    );
    assert_eq!(
        t.log.pop(),
        Some((
            r#"INSERT INTO "table4" ("id", "column1", "table5_id") VALUES (?1, ?2, ?3)"#.to_string(),
            vec![Value::from("x"), Value::from("a"), Value::I64(1)]
        ))
    );
    assert_eq!(
        t.log.pop(),
        Some((
            r#"UPDATE "table5" SET "table4_id" = ?1 WHERE "id" = ?2"#.to_string(),
            vec![Value::from("x"), Value::I64(1)]
        ))
    );
    assert!(t.log.is_empty());

    assert_eq!(graph[b].value("table4_id"), &Value::from("x"));
    assert_eq!(
        rows(&t.db, "SELECT id, table4_id FROM table5").await,
        vec![record(&[("id", Value::I64(1)), ("table4_id", Value::from("x"))])]
    );
}

#[tokio::test]
async fn preset_reference_to_an_unwritten_row_is_cleared_until_it_exists() {
    let mut t = setup().await;
    enforce_foreign_keys(&mut t).await;

    let mut graph = Graph::new();
    let a = graph.add(record(&[("id", Value::from("x")), ("column1", Value::from("a"))]));
    let b = graph.add(record(&[
        ("column1", Value::from("b")),
        ("table4_id", Value::from("x")),
    ]));
    graph.set_one(a, "object5", Some(b));
    graph.set_one(b, "object4", Some(a));

    t.db.store("table4", &mut graph, a).await.unwrap();

    assert_eq!(
        t.log.pop(),
        Some((
            r#"INSERT INTO "table5" ("column1", "table4_id") VALUES (?1, ?2)"#.to_string(),
            vec![Value::from("b"), Value::Null]
        ))
    );
    assert_eq!(t.log.count("UPDATE"), 1);
    assert_eq!(
        rows(&t.db, "SELECT table4_id FROM table5").await,
        vec![record(&[("table4_id", Value::from("x"))])]
    );
}

#[tokio::test]
async fn child_reached_again_through_its_parent_is_written_once() {
    let mut t = setup().await;

    let mut graph = Graph::new();
    let child = graph.add(record(&[("column1", Value::from("child"))]));
    let parent = graph.add(record(&[("column1", Value::from("parent"))]));
    graph.set_one(child, "manyToOneObject1", Some(parent));
    graph.push_many(parent, "oneToManyObject1", child);

    let info = t.db.store("table1", &mut graph, child).await.unwrap();

    assert_eq!(
        info.to_json(),
        json!({
            "id": 2,
            "@update": false,
            "manyToOneObject1": { "id": 1, "@update": false, "oneToManyObject1": [] },
        })
    );
    assert_eq!(t.log.count("INSERT"), 2);
    assert_eq!(t.log.count("UPDATE"), 0);
    assert_eq!(
        t.log.sql()[1],
        r#"INSERT INTO "table1" ("column1", "many_to_one_object1_id") VALUES (?1, ?2)"#
    );
    assert_eq!(graph[child].value("many_to_one_object1_id"), &Value::I64(1));
}
