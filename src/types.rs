use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One historical period's labor numbers for an employee.
/// This is the estimator's input shape; sequences are time-ordered,
/// oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Hours actively worked in the period.
    pub working_hours: f64,
    /// Efficiency score assigned to the period (0-100).
    pub efficiency: f64,
}

/// Persisted per-period work record backing the observation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    pub id: Uuid,
    pub employee_id: String,
    pub date: NaiveDate,
    pub working_hours: f64,
    pub efficiency: f64,
}

impl From<&WorkRecord> for Observation {
    fn from(rec: &WorkRecord) -> Self {
        Self {
            working_hours: rec.working_hours,
            efficiency: rec.efficiency,
        }
    }
}

/// Request body for creating or replacing a work record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub working_hours: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Intermediate factors the estimator combined, embedded in the output
/// so callers can see how the number was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFactors {
    pub historical_average: f64,
    /// Unrounded mean efficiency; the top-level `efficiency` field is the
    /// rounded counterpart.
    pub efficiency_trend: f64,
    pub seasonality: f64,
    pub workload_trend: f64,
}

/// One forward-looking projection. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadPrediction {
    pub employee_id: String,
    pub prediction_date: DateTime<Utc>,
    /// Projected labor hours, rounded to 1 decimal place.
    pub predicted_hours: f64,
    /// Mean efficiency rounded to the nearest integer.
    pub efficiency: i64,
    /// 0-100.
    pub confidence: u8,
    pub risk_level: RiskLevel,
    pub factors: PredictionFactors,
}
