use pretty_assertions::assert_eq;
use rowgraph::Value;
use serde_json::json;
use tests::setup;

#[tokio::test]
async fn stored_graph_loads_back() {
    let t = setup().await;

    t.db.store_json(
        "table1",
        &json!({
            "column1": "p",
            "oneToManyObject1": [{ "column1": "c1" }, { "column1": "c2" }],
            "manyToManyObject2": [{ "column1": "x", "object2": { "column1": "t2" } }],
        }),
    )
    .await
    .unwrap();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({
                "id": 1,
                "oneToManyObject1": { "@load": true, "@orderBy": "id" },
                "manyToManyObject2": { "@load": true, "object2": { "@load": true } },
            }),
        )
        .await
        .unwrap();

    assert_eq!(
        loaded.graph.to_json_list(&loaded.roots),
        json!([{
            "id": 1,
            "column1": "p",
            "many_to_one_object1_id": null,
            "one_to_one_object1_id": null,
            "oneToManyObject1": [
                { "id": 2, "column1": "c1", "many_to_one_object1_id": 1, "one_to_one_object1_id": null },
                { "id": 3, "column1": "c2", "many_to_one_object1_id": 1, "one_to_one_object1_id": null },
            ],
            "manyToManyObject2": [{
                "table1_id": 1,
                "table2_id": 1,
                "column1": "x",
                "object2": { "id": 1, "column1": "t2" },
            }],
        }])
    );
}

#[tokio::test]
async fn joined_children_do_not_duplicate_the_parent() {
    let t = setup().await;

    t.db.store_json(
        "table1",
        &json!({
            "column1": "p",
            "oneToManyObject1": [{ "column1": "a" }, { "column1": "b" }, { "column1": "c" }],
        }),
    )
    .await
    .unwrap();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({ "column1": "p", "oneToManyObject1": { "@load": true } }),
        )
        .await
        .unwrap();

    assert_eq!(loaded.roots.len(), 1);

    let children = loaded.graph[loaded.roots[0]].many("oneToManyObject1");
    let names: Vec<_> = children
        .iter()
        .map(|child| loaded.graph[*child].value("column1").clone())
        .collect();
    assert_eq!(names, vec![Value::from("a"), "b".into(), "c".into()]);
}

#[tokio::test]
async fn load_separately_issues_a_second_query() {
    let mut t = setup().await;

    t.db.store_json(
        "table1",
        &json!({
            "column1": "p",
            "manyToManyObject2": [
                { "column1": "a", "object2": { "column1": "t1" } },
                { "column1": "b", "object2": { "column1": "t2" } },
            ],
        }),
    )
    .await
    .unwrap();
    t.log.clear();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({ "manyToManyObject2": { "@loadSeparately": true, "column1": "a" } }),
        )
        .await
        .unwrap();

    let sql = t.log.sql();
    assert_eq!(sql.len(), 2);
    assert!(!sql[0].contains("JOIN"), "{}", sql[0]);
    assert!(!sql[0].contains("WHERE"), "{}", sql[0]);
    assert!(sql[1].contains(r#"FROM "table1_table2""#), "{}", sql[1]);
    assert!(sql[1].contains(" IN ("), "{}", sql[1]);

    assert_eq!(
        loaded.graph.to_json_list(&loaded.roots),
        json!([{
            "id": 1,
            "column1": "p",
            "many_to_one_object1_id": null,
            "one_to_one_object1_id": null,
            "manyToManyObject2": [{ "table1_id": 1, "table2_id": 1, "column1": "a" }],
        }])
    );
}

#[tokio::test]
async fn separately_loaded_rows_load_their_own_relationships() {
    let t = setup().await;

    t.db.store_json(
        "table1",
        &json!({
            "column1": "p",
            "manyToManyObject2": [{ "column1": "a", "object2": { "column1": "t1" } }],
        }),
    )
    .await
    .unwrap();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({
                "manyToManyObject2": {
                    "@loadSeparately": true,
                    "object2": { "@load": true },
                },
            }),
        )
        .await
        .unwrap();

    let root = &loaded.graph[loaded.roots[0]];
    let link = root.many("manyToManyObject2")[0];
    let object2 = loaded.graph[link].one("object2").unwrap();
    assert_eq!(loaded.graph[object2].value("column1"), &"t1".into());
}

#[tokio::test]
async fn outer_limit_takes_precedence() {
    let mut t = setup().await;

    for name in ["a", "b", "c"] {
        t.db.store_json("table1", &json!({ "column1": name }))
            .await
            .unwrap();
    }
    t.log.clear();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({
                "@limit": 2,
                "@orderBy": { "field": "id", "direction": "desc" },
                "oneToManyObject1": { "@load": true, "@limit": 15 },
            }),
        )
        .await
        .unwrap();

    let sql = t.log.sql();
    assert!(sql[0].ends_with(" LIMIT 2"), "{}", sql[0]);

    let ids: Vec<_> = loaded
        .roots
        .iter()
        .map(|root| loaded.graph[*root].value("id").clone())
        .collect();
    assert_eq!(ids, vec![Value::I64(3), Value::I64(2)]);
}

#[tokio::test]
async fn connectives_combine_filters() {
    let t = setup().await;

    for name in ["a", "b", "c"] {
        t.db.store_json("table1", &json!({ "column1": name }))
            .await
            .unwrap();
    }

    let names = |loaded: rowgraph::Loaded| -> Vec<String> {
        loaded
            .roots
            .iter()
            .filter_map(|root| loaded.graph[*root].value("column1").as_str())
            .map(str::to_string)
            .collect()
    };

    let loaded = t
        .db
        .load("table1", &json!([{ "column1": "a" }, { "column1": "c" }]))
        .await
        .unwrap();
    assert_eq!(names(loaded), vec!["a", "c"]);

    let loaded = t
        .db
        .load(
            "table1",
            &json!({ "column1": [{ "operator": ">", "value": "a" }, "AND", { "operator": "<>", "value": "c" }] }),
        )
        .await
        .unwrap();
    assert_eq!(names(loaded), vec!["b"]);

    let loaded = t
        .db
        .load("table1", &json!({ "column1": ["a", "b"], "@not": true }))
        .await
        .unwrap();
    assert_eq!(names(loaded), vec!["c"]);

    let loaded = t.db.load("table1", &json!({ "column1": [] })).await.unwrap();
    assert!(loaded.roots.is_empty());
}

#[tokio::test]
async fn count_ignores_join_fan_out() {
    let t = setup().await;

    t.db.store_json(
        "table1",
        &json!({
            "column1": "p",
            "oneToManyObject1": [{ "column1": "c" }, { "column1": "c" }],
        }),
    )
    .await
    .unwrap();

    assert_eq!(t.db.count("table1", &json!({})).await.unwrap(), 3);
    assert_eq!(
        t.db.count("table1", &json!({ "oneToManyObject1": { "column1": "c" } }))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn validate_reports_unknown_keys() {
    let t = setup().await;

    let issues = t
        .db
        .validate(
            "table1",
            &json!({ "nope": 1, "oneToManyObject1": { "@limit": "ten" } }),
        )
        .unwrap();

    let locations: Vec<_> = issues.iter().map(|issue| issue.location.as_str()).collect();
    assert_eq!(locations, vec![".nope", ".oneToManyObject1.@limit"]);
}

#[tokio::test]
async fn xor_keeps_rows_matching_exactly_one_side() {
    let mut t = setup().await;

    for name in ["a", "b", "c"] {
        t.db.store_json("table1", &json!({ "column1": name }))
            .await
            .unwrap();
    }
    t.log.clear();

    let loaded = t
        .db
        .load(
            "table1",
            &json!([{ "column1": ["a", "b"] }, "XOR", { "column1": ["b", "c"] }]),
        )
        .await
        .unwrap();

    let names: Vec<_> = loaded
        .roots
        .iter()
        .map(|root| loaded.graph[*root].value("column1").clone())
        .collect();
    assert_eq!(names, vec![Value::from("a"), "c".into()]);

    let sql = t.log.sql();
    assert!(sql[0].contains(") <> ("), "{}", sql[0]);
}

#[tokio::test]
async fn deep_join_path_loads_through_short_labels() {
    let mut t = setup().await;

    t.db.store_json(
        "table1",
        &json!({ "column1": "child", "manyToOneObject1": { "column1": "parent" } }),
    )
    .await
    .unwrap();
    t.log.clear();

    let loaded = t
        .db
        .load(
            "table1",
            &json!({
                "id": 2,
                "manyToOneObject1": { "@load": true, "oneToManyObject1": { "@load": true } },
            }),
        )
        .await
        .unwrap();

    let sql = &t.log.sql()[0];
    for ident in sql.split('"').skip(1).step_by(2) {
        assert!(ident.len() <= 63, "{ident}");
    }

    assert_eq!(
        loaded.graph.to_json_list(&loaded.roots),
        json!([{
            "id": 2,
            "column1": "child",
            "many_to_one_object1_id": 1,
            "one_to_one_object1_id": null,
            "manyToOneObject1": {
                "id": 1,
                "column1": "parent",
                "many_to_one_object1_id": null,
                "one_to_one_object1_id": null,
                "oneToManyObject1": [
                    { "id": 2, "column1": "child", "many_to_one_object1_id": 1, "one_to_one_object1_id": null },
                ],
            },
        }])
    );
}
