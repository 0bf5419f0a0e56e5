use asmanager::config::{Config, StorageMode};
use asmanager::core::dashboard::aggregate;
use asmanager::db::{RecordStore, SqliteStore, open_store};
use asmanager::errors::AppError;
use asmanager::models::activity::NewActivity;
use asmanager::models::category::Category;
use serde_json::{Value, json};

mod common;
use common::{both_stores, record, setup_test_db};

fn ids_in_order(rows: &[asmanager::models::record::WireRecord]) -> Vec<i64> {
    rows.iter()
        .map(|r| r["id"].as_i64().expect("numeric id"))
        .collect()
}

#[test]
fn test_insert_then_get_returns_request_fields() {
    for store in both_stores("insert_get") {
        for category in Category::ALL {
            let created = store
                .insert(
                    category,
                    &record(json!({
                        "no": 1,
                        "division": "A/S",
                        "claim_no": "CL-001",
                        "hull_number": "H2231",
                        "product_name": "LED 40W",
                    })),
                )
                .unwrap();

            let id = created["id"].as_i64().unwrap();
            let fetched = store.get(category, id).unwrap();

            assert_eq!(fetched, created, "{} / {}", store.backend_name(), category);
            assert_eq!(fetched["no"], json!(1));
            assert_eq!(fetched["claim_no"], json!("CL-001"));
            assert_eq!(fetched["status"], json!("incomplete"));
            // fields not sent default to ""
            assert_eq!(fetched["notes"], json!(""));
            assert_eq!(fetched["quantity"], json!(""));

            // exactly the registry fields plus id and status
            assert_eq!(fetched.len(), category.fields().len() + 2);
        }
    }
}

#[test]
fn test_insert_drops_unknown_fields() {
    for store in both_stores("insert_unknown") {
        let created = store
            .insert(
                Category::Converter,
                &record(json!({ "converter_code": "CV-9", "colour": "red" })),
            )
            .unwrap();

        assert_eq!(created["converter_code"], json!("CV-9"));
        assert!(created.get("colour").is_none());
    }
}

#[test]
fn test_update_only_touches_present_fields() {
    for store in both_stores("update_partial") {
        let created = store
            .insert(
                Category::General,
                &record(json!({
                    "no": 4,
                    "product_name": "Ballast",
                    "notes": "waiting for parts",
                    "status": "completed",
                })),
            )
            .unwrap();
        let id = created["id"].as_i64().unwrap();

        let updated = store
            .update(Category::General, id, &record(json!({ "notes": "shipped" })))
            .unwrap();

        assert_eq!(updated["notes"], json!("shipped"));
        assert_eq!(updated["product_name"], json!("Ballast"));
        assert_eq!(updated["no"], json!(4));
        assert_eq!(updated["status"], json!("completed"), "{}", store.backend_name());
        assert_eq!(updated["id"], json!(id));

        let fetched = store.get(Category::General, id).unwrap();
        assert_eq!(fetched, updated);
    }
}

#[test]
fn test_update_never_changes_id() {
    for store in both_stores("update_id") {
        let created = store
            .insert(Category::Floodlight, &record(json!({ "no": 1 })))
            .unwrap();
        let id = created["id"].as_i64().unwrap();

        let updated = store
            .update(
                Category::Floodlight,
                id,
                &record(json!({ "id": id + 1000, "no": 2 })),
            )
            .unwrap();

        assert_eq!(updated["id"], json!(id));
        assert!(matches!(
            store.get(Category::Floodlight, id + 1000),
            Err(AppError::NotFound)
        ));
    }
}

#[test]
fn test_missing_ids_are_not_found() {
    for store in both_stores("missing_ids") {
        assert!(matches!(
            store.get(Category::General, 424242),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            store.update(Category::General, 424242, &record(json!({ "notes": "x" }))),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            store.update(Category::General, 424242, &record(json!({}))),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            store.delete_one(Category::General, 424242),
            Err(AppError::NotFound)
        ));
    }
}

#[test]
fn test_delete_one_and_delete_all() {
    for store in both_stores("delete") {
        let a = store
            .insert(Category::General, &record(json!({ "no": 1 })))
            .unwrap();
        store
            .insert(Category::General, &record(json!({ "no": 2 })))
            .unwrap();
        let other = store
            .insert(Category::Converter, &record(json!({ "no": 1 })))
            .unwrap();

        store
            .delete_one(Category::General, a["id"].as_i64().unwrap())
            .unwrap();
        assert_eq!(store.list(Category::General).unwrap().len(), 1);

        store.delete_all(Category::General).unwrap();
        assert!(store.list(Category::General).unwrap().is_empty());

        // idempotent
        store.delete_all(Category::General).unwrap();

        // other categories untouched
        let converters = store.list(Category::Converter).unwrap();
        assert_eq!(converters, vec![other]);
    }
}

#[test]
fn test_list_orders_by_no() {
    for store in both_stores("list_order") {
        for no in [3, 1, 2] {
            store
                .insert(Category::General, &record(json!({ "no": no })))
                .unwrap();
        }

        let nos: Vec<Value> = store
            .list(Category::General)
            .unwrap()
            .into_iter()
            .map(|r| r["no"].clone())
            .collect();
        assert_eq!(nos, vec![json!(1), json!(2), json!(3)]);
    }
}

#[test]
fn test_renumber_reassigns_dense_sequence() {
    for store in both_stores("renumber") {
        let a = store
            .insert(Category::Converter, &record(json!({ "no": 5 })))
            .unwrap();
        let b = store
            .insert(Category::Converter, &record(json!({ "no": 3 })))
            .unwrap();
        let c = store
            .insert(Category::Converter, &record(json!({ "no": 8 })))
            .unwrap();

        store.renumber(Category::Converter).unwrap();

        let rows = store.list(Category::Converter).unwrap();
        assert_eq!(
            ids_in_order(&rows),
            vec![
                b["id"].as_i64().unwrap(),
                a["id"].as_i64().unwrap(),
                c["id"].as_i64().unwrap()
            ]
        );
        let nos: Vec<Value> = rows.iter().map(|r| r["no"].clone()).collect();
        assert_eq!(nos, vec![json!(1), json!(2), json!(3)]);
    }
}

#[test]
fn test_renumber_keeps_ties_in_storage_order() {
    for store in both_stores("renumber_ties") {
        let first = store
            .insert(Category::General, &record(json!({ "no": 2 })))
            .unwrap();
        let second = store
            .insert(Category::General, &record(json!({ "no": 2 })))
            .unwrap();
        let head = store
            .insert(Category::General, &record(json!({ "no": 1 })))
            .unwrap();

        store.renumber(Category::General).unwrap();

        let rows = store.list(Category::General).unwrap();
        assert_eq!(
            ids_in_order(&rows),
            vec![
                head["id"].as_i64().unwrap(),
                first["id"].as_i64().unwrap(),
                second["id"].as_i64().unwrap()
            ]
        );
    }
}

#[test]
fn test_next_no() {
    for store in both_stores("next_no") {
        assert_eq!(store.next_no(Category::Floodlight).unwrap(), 1);

        store
            .insert(Category::Floodlight, &record(json!({ "no": 7 })))
            .unwrap();
        assert_eq!(store.next_no(Category::Floodlight).unwrap(), 8);

        // numeric strings count, blank ones do not
        store
            .insert(Category::Floodlight, &record(json!({ "no": "12" })))
            .unwrap();
        store
            .insert(Category::Floodlight, &record(json!({ "no": "" })))
            .unwrap();
        assert_eq!(store.next_no(Category::Floodlight).unwrap(), 13);

        // advisory only: nothing was reserved
        assert_eq!(store.next_no(Category::Floodlight).unwrap(), 13);
    }
}

#[test]
fn test_bulk_upsert_clear_first_replaces_everything() {
    for store in both_stores("bulk_clear") {
        for no in 1..=3 {
            store
                .insert(Category::General, &record(json!({ "no": no })))
                .unwrap();
        }

        let count = store
            .bulk_upsert(
                Category::General,
                &[
                    record(json!({ "no": 1, "product_name": "Lamp" })),
                    record(json!({ "no": 2, "product_name": "Driver", "status": "completed" })),
                ],
                true,
            )
            .unwrap();
        assert_eq!(count, 2);

        let rows = store.list(Category::General).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["product_name"], json!("Lamp"));
        assert_eq!(rows[0]["status"], json!("incomplete"));
        assert_eq!(rows[1]["product_name"], json!("Driver"));
        assert_eq!(rows[1]["status"], json!("completed"));
    }
}

#[test]
fn test_bulk_upsert_replaces_whole_row_by_id() {
    for store in both_stores("bulk_replace") {
        let created = store
            .insert(
                Category::Converter,
                &record(json!({
                    "no": 1,
                    "converter_number": "C-1",
                    "installation_location": "Engine room",
                    "status": "completed",
                })),
            )
            .unwrap();
        let id = created["id"].as_i64().unwrap();

        store
            .bulk_upsert(
                Category::Converter,
                &[
                    record(json!({ "id": id, "no": 1, "converter_number": "C-1b" })),
                    record(json!({ "no": 2, "converter_number": "C-2" })),
                ],
                false,
            )
            .unwrap();

        let replaced = store.get(Category::Converter, id).unwrap();
        assert_eq!(replaced["converter_number"], json!("C-1b"));
        // unlike update, absent fields are reset
        assert_eq!(replaced["installation_location"], json!(""));
        assert_eq!(replaced["status"], json!("incomplete"));

        assert_eq!(store.list(Category::Converter).unwrap().len(), 2);
    }
}

#[test]
fn test_bulk_upsert_inserts_with_supplied_id() {
    for store in both_stores("bulk_supplied_id") {
        store
            .bulk_upsert(
                Category::Floodlight,
                &[record(json!({ "id": 77, "no": 1, "notes": "imported" }))],
                false,
            )
            .unwrap();

        let row = store.get(Category::Floodlight, 77).unwrap();
        assert_eq!(row["notes"], json!("imported"));
    }
}

#[test]
fn test_inserted_ids_are_unique() {
    for store in both_stores("unique_ids") {
        let mut ids: Vec<i64> = (0..20)
            .map(|i| {
                store
                    .insert(Category::General, &record(json!({ "no": i })))
                    .unwrap()["id"]
                    .as_i64()
                    .unwrap()
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}

#[test]
fn test_activities_newest_first_and_capped() {
    for store in both_stores("activities") {
        for n in 0..5 {
            store
                .record_activity(NewActivity {
                    kind: Some("create".into()),
                    message: Some(format!("entry {n}")),
                    item_name: Some("LED".into()),
                    icon: Some("plus".into()),
                })
                .unwrap();
        }

        let recent = store.recent_activities(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message.as_deref(), Some("entry 4"));
        assert!(recent.windows(2).all(|w| w[0].id > w[1].id));
        assert!(recent[0].timestamp.ends_with('Z'));
    }
}

#[tokio::test]
async fn test_dashboard_on_empty_store() {
    for store in both_stores("dashboard_empty") {
        let summary = aggregate(store).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.incomplete, 0);
        assert_eq!(summary.completion_rate, "0.0");
        assert_eq!(summary.categories.len(), 3);
    }
}

#[tokio::test]
async fn test_dashboard_counts_across_categories() {
    for store in both_stores("dashboard_counts") {
        store
            .insert(Category::General, &record(json!({ "status": "completed" })))
            .unwrap();
        store
            .insert(Category::General, &record(json!({})))
            .unwrap();
        store
            .insert(Category::Converter, &record(json!({ "status": "pending" })))
            .unwrap();

        let summary = aggregate(store).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.incomplete, 2);
        assert_eq!(summary.completion_rate, "33.3");

        let general = summary.categories[&Category::General];
        assert_eq!((general.total, general.completed, general.incomplete), (2, 1, 1));
        assert_eq!(summary.categories[&Category::Floodlight].total, 0);
    }
}

#[test]
fn test_next_no_at_the_top_of_the_range_is_an_error() {
    for store in both_stores("next_no_max") {
        store
            .insert(Category::General, &record(json!({ "no": i64::MAX })))
            .unwrap();
        assert!(matches!(
            store.next_no(Category::General),
            Err(AppError::NoExhausted)
        ));

        // a real beyond i64 is clamped, not wrapped
        store
            .insert(Category::Converter, &record(json!({ "no": 1e19 })))
            .unwrap();
        assert!(matches!(
            store.next_no(Category::Converter),
            Err(AppError::NoExhausted)
        ));

        // the store keeps serving afterwards
        assert_eq!(store.list(Category::General).unwrap().len(), 1);
        assert_eq!(store.next_no(Category::Floodlight).unwrap(), 1);
    }
}

#[test]
fn test_insert_after_max_id_picks_another_free_id() {
    for store in both_stores("insert_after_max_id") {
        store
            .bulk_upsert(
                Category::General,
                &[record(json!({ "id": i64::MAX, "no": 1 }))],
                false,
            )
            .unwrap();

        let created = store
            .insert(Category::General, &record(json!({ "no": 2 })))
            .unwrap();
        let id = created["id"].as_i64().unwrap();
        assert_ne!(id, i64::MAX);

        let rows = store.list(Category::General).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.get(Category::General, id).unwrap()["no"], json!(2));
    }
}

#[test]
fn test_activity_id_exhaustion_leaves_the_log_readable() {
    let store = SqliteStore::open(&setup_test_db("activity_max_id")).unwrap();
    store
        .with_conn(|conn| {
            conn.execute(
                "INSERT INTO recent_activities (id, type, message) VALUES (?1, 'seed', 'seed')",
                [i64::MAX],
            )?;
            Ok(())
        })
        .unwrap();

    let draft = NewActivity {
        kind: Some("create".into()),
        message: Some("after the last id".into()),
        ..NewActivity::default()
    };
    assert!(matches!(
        store.record_activity(draft),
        Err(AppError::IdExhausted)
    ));

    let recent = store.recent_activities(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, i64::MAX);
}

#[test]
fn test_failed_bulk_upsert_changes_nothing() {
    let store = SqliteStore::open(&setup_test_db("bulk_rollback")).unwrap();
    for no in 1..=2 {
        store
            .insert(Category::General, &record(json!({ "no": no, "notes": "kept" })))
            .unwrap();
    }
    let before = store.list(Category::General).unwrap();

    store
        .with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_marker BEFORE INSERT ON as_general
                 WHEN NEW.notes = 'reject'
                 BEGIN SELECT RAISE(ABORT, 'marker rejected'); END;",
            )?;
            Ok(())
        })
        .unwrap();

    let result = store.bulk_upsert(
        Category::General,
        &[
            record(json!({ "no": 10, "notes": "first" })),
            record(json!({ "no": 11, "notes": "reject" })),
            record(json!({ "no": 12, "notes": "never reached" })),
        ],
        true,
    );
    assert!(matches!(result, Err(AppError::Db(_))));

    // neither the clear nor the first insert survived
    assert_eq!(store.list(Category::General).unwrap(), before);
}

#[test]
fn test_auto_storage_creates_missing_database_dir() {
    let dir = std::env::temp_dir().join("asmanager_auto_fresh_dir");
    std::fs::remove_dir_all(&dir).ok();
    let db_path = dir.join("nested").join("as_management.db");

    let cfg = Config {
        database: db_path.to_string_lossy().to_string(),
        storage: StorageMode::Auto,
        ..Config::default()
    };
    let store = open_store(&cfg).unwrap();

    assert_eq!(store.backend_name(), "sqlite");
    assert!(db_path.exists());
}
