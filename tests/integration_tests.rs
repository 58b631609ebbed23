/// Integration tests for the work record stores and the store-to-estimator
/// flow.
///
/// Run with: cargo test --test integration_tests -- --nocapture
use chrono::NaiveDate;

use workload_backend::model;
use workload_backend::store::{
    JsonFileStore, MemoryStore, PredictionStore, StoreError, WorkRecordStore,
};
use workload_backend::types::{NewWorkRecord, Observation, RiskLevel};

fn record(employee_id: &str, day: u32, hours: f64, efficiency: f64) -> NewWorkRecord {
    NewWorkRecord {
        employee_id: employee_id.to_string(),
        date: NaiveDate::from_ymd_opt(2026, 8, day).expect("valid date"),
        working_hours: hours,
        efficiency,
    }
}

#[test]
fn test_memory_store_crud_round_trip() {
    println!("\n=== Test: Memory Store CRUD ===");
    let store = MemoryStore::new();

    let created = store
        .create(record("emp-1", 1, 8.0, 85.0))
        .expect("create should succeed");
    println!("✓ Created record {}", created.id);

    let fetched = store.get(created.id).expect("get should succeed");
    assert_eq!(fetched.employee_id, "emp-1");
    assert_eq!(fetched.working_hours, 8.0);

    let updated = store
        .update(created.id, record("emp-1", 1, 9.5, 88.0))
        .expect("update should succeed");
    assert_eq!(updated.working_hours, 9.5);
    assert_eq!(updated.id, created.id, "update must keep the id");

    store.delete(created.id).expect("delete should succeed");
    assert!(
        matches!(store.get(created.id), Err(StoreError::NotFound(_))),
        "deleted record should be gone"
    );
    println!("✓ CRUD round trip passed");
}

#[test]
fn test_list_filters_by_employee() {
    let store = MemoryStore::new();
    store.create(record("emp-1", 1, 8.0, 85.0)).unwrap();
    store.create(record("emp-1", 2, 8.0, 85.0)).unwrap();
    store.create(record("emp-2", 1, 6.0, 70.0)).unwrap();

    let all = store.list(None).unwrap();
    assert_eq!(all.len(), 3);

    let one = store.list(Some("emp-2")).unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].employee_id, "emp-2");
}

#[test]
fn test_recent_for_employee_ordering_and_truncation() {
    println!("\n=== Test: Recent History Ordering ===");
    let store = MemoryStore::new();

    // Insert out of date order to prove the store sorts, not the caller.
    for day in [5u32, 1, 3, 2, 4] {
        store
            .create(record("emp-1", day, day as f64, 80.0))
            .unwrap();
    }
    store.create(record("emp-2", 1, 99.0, 80.0)).unwrap();

    let recent = store.recent_for_employee("emp-1", 10).unwrap();
    assert_eq!(recent.len(), 5, "other employees must be excluded");
    for window in recent.windows(2) {
        assert!(window[0].date <= window[1].date, "history not oldest-first");
    }

    // Limit keeps the most recent tail, still oldest-first.
    let capped = store.recent_for_employee("emp-1", 3).unwrap();
    assert_eq!(capped.len(), 3);
    assert_eq!(capped[0].working_hours, 3.0);
    assert_eq!(capped[2].working_hours, 5.0);
    println!("✓ Ordering and truncation correct");
}

#[test]
fn test_json_file_store_persists_across_reopen() {
    println!("\n=== Test: JSON File Store Persistence ===");
    let dir = tempfile::tempdir().expect("tempdir");

    let created = {
        let store = JsonFileStore::new(dir.path()).expect("store should open");
        store
            .create(record("emp-1", 1, 8.0, 85.0))
            .expect("create should succeed")
    };

    // A fresh store over the same directory sees the same data.
    let reopened = JsonFileStore::new(dir.path()).expect("store should reopen");
    let fetched = reopened.get(created.id).expect("record should persist");
    assert_eq!(fetched.working_hours, 8.0);

    reopened.delete(created.id).unwrap();
    assert!(reopened.list(None).unwrap().is_empty());
    println!("✓ Records persist across store instances");
}

#[test]
fn test_json_file_store_missing_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("store should open");

    let missing = uuid::Uuid::new_v4();
    assert!(matches!(store.get(missing), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.update(missing, record("emp-1", 1, 8.0, 85.0)),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.delete(missing),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_prediction_store_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("store should open");

    let prediction = model::predict_for_month("emp-1", &[], 0);
    store.save(&prediction).expect("save should succeed");

    let saved = store.for_employee("emp-1").unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].predicted_hours, prediction.predicted_hours);
    assert!(store.for_employee("emp-2").unwrap().is_empty());
}

#[test]
fn test_store_to_estimator_flow() {
    println!("\n=== Test: Store → Estimator Flow ===");
    let store = MemoryStore::new();

    // Two weeks of history: a quiet first week, a busy second week.
    for day in 1..=7u32 {
        store.create(record("emp-1", day, 4.0, 90.0)).unwrap();
    }
    for day in 8..=14u32 {
        store.create(record("emp-1", day, 8.0, 90.0)).unwrap();
    }

    let records = store.recent_for_employee("emp-1", 30).unwrap();
    let history: Vec<Observation> = records.iter().map(Observation::from).collect();
    let prediction = model::predict_for_month("emp-1", &history, 0);

    println!(
        "✓ Predicted {}h at confidence {} ({:?})",
        prediction.predicted_hours, prediction.confidence, prediction.risk_level
    );
    assert_eq!(prediction.factors.workload_trend, 2.0, "ramp-up not detected");
    assert_eq!(prediction.factors.historical_average, 6.0);
    assert_eq!(prediction.predicted_hours, 12.0);
    assert_eq!(prediction.risk_level, RiskLevel::Low);
    assert_eq!(prediction.confidence, 88); // min(95, 60 + 2*14)
}

#[test]
fn test_history_limit_caps_observations() {
    let store = MemoryStore::new();
    for day in 1..=20u32 {
        store.create(record("emp-1", day, 8.0, 90.0)).unwrap();
    }

    // The prediction call site caps history; a limit of 5 must drop the
    // older 15 records before the estimator sees them.
    let records = store.recent_for_employee("emp-1", 5).unwrap();
    assert_eq!(records.len(), 5);
    let history: Vec<Observation> = records.iter().map(Observation::from).collect();
    let prediction = model::predict_for_month("emp-1", &history, 0);
    assert_eq!(prediction.confidence, 70); // min(95, 60 + 2*5), low risk
}

#[test]
fn test_prediction_serializes_camel_case() {
    let prediction = model::predict_for_month("emp-1", &[], 0);
    let value = serde_json::to_value(&prediction).expect("should serialize");

    assert!(value.get("employeeId").is_some());
    assert!(value.get("predictedHours").is_some());
    assert!(value.get("riskLevel").is_some());
    assert_eq!(value["riskLevel"], "medium");
    let factors = &value["factors"];
    assert!(factors.get("historicalAverage").is_some());
    assert!(factors.get("workloadTrend").is_some());
}
