use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::model;
use crate::store::{PredictionStore, StoreError, WorkRecordStore};
use crate::types::{NewWorkRecord, Observation};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn WorkRecordStore>,
    pub predictions: Arc<dyn PredictionStore>,
    /// Observation cap for predictions; call sites default to 30.
    pub history_limit: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/workload/records",
            get(list_records).post(create_record),
        )
        .route(
            "/api/workload/records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route(
            "/api/workload/predictions/:employee_id",
            get(predict_for_employee),
        )
        .with_state(state)
}

// ---------- Envelope helpers ----------

type ApiError = (StatusCode, Json<serde_json::Value>);

fn ok<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

fn store_error(e: StoreError) -> ApiError {
    let status = match e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}

// ---------- Handlers ----------

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    employee_id: Option<String>,
}

async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state
        .records
        .list(query.employee_id.as_deref())
        .map_err(store_error)?;
    Ok(ok(records))
}

async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<NewWorkRecord>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let record = state.records.create(payload).map_err(store_error)?;
    Ok((StatusCode::CREATED, ok(record)))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let record = state.records.get(id).map_err(store_error)?;
    Ok(ok(record))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewWorkRecord>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let record = state.records.update(id, payload).map_err(store_error)?;
    Ok(ok(record))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.records.delete(id).map_err(store_error)?;
    Ok(ok(json!({ "id": id })))
}

/// Load the employee's recent history, run the estimator, and persist the
/// result best-effort: a failed save is logged, never surfaced.
async fn predict_for_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state
        .records
        .recent_for_employee(&employee_id, state.history_limit)
        .map_err(store_error)?;
    let history: Vec<Observation> = records.iter().map(Observation::from).collect();

    let prediction = model::predict(&employee_id, &history);
    tracing::info!(
        "prediction employee={} observations={} hours={} risk={:?} confidence={}",
        employee_id,
        history.len(),
        prediction.predicted_hours,
        prediction.risk_level,
        prediction.confidence
    );

    if let Err(e) = state.predictions.save(&prediction) {
        tracing::warn!("failed to persist prediction for {}: {}", employee_id, e);
    }

    Ok(ok(prediction))
}
