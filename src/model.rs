use chrono::{Datelike, Utc};

use crate::types::{Observation, PredictionFactors, RiskLevel, WorkloadPrediction};

/// Month-indexed workload multipliers, January = index 0.
/// Approximates expected swing across the production calendar.
const SEASONALITY: [f64; 12] = [1.0, 1.1, 1.2, 1.1, 1.0, 0.9, 0.8, 0.9, 1.0, 1.1, 1.2, 1.0];

/// Window length for the recent/older trend comparison.
const TREND_WINDOW: usize = 7;

const DEFAULT_HOURS: f64 = 8.0;
const DEFAULT_EFFICIENCY: f64 = 80.0;

/// Project the next period's workload for one employee.
///
/// `history` is the employee's prior observations, oldest first; it may be
/// empty. The projection combines the historical average, a seasonal
/// multiplier for the current calendar month, and a recent-vs-older trend
/// ratio, then classifies risk from the mean efficiency.
///
/// Total over its inputs: empty history and zero denominators fall back to
/// fixed defaults, so this never fails. Malformed values (negative hours,
/// out-of-range efficiency) are not rejected; they flow through the
/// arithmetic unchanged.
pub fn predict(employee_id: &str, history: &[Observation]) -> WorkloadPrediction {
    predict_for_month(employee_id, history, Utc::now().month0() as usize)
}

/// Same as [`predict`] but with an explicit 0-based month index for the
/// seasonality lookup, so callers and tests can pin the calendar month.
pub fn predict_for_month(
    employee_id: &str,
    history: &[Observation],
    month_index: usize,
) -> WorkloadPrediction {
    let n = history.len();

    let historical_average = if n == 0 {
        DEFAULT_HOURS
    } else {
        history.iter().map(|o| o.working_hours).sum::<f64>() / n as f64
    };
    let efficiency_trend = if n == 0 {
        DEFAULT_EFFICIENCY
    } else {
        history.iter().map(|o| o.efficiency).sum::<f64>() / n as f64
    };
    let seasonality = SEASONALITY[month_index % SEASONALITY.len()];
    let workload_trend = workload_trend(history);

    let predicted_hours = round1(historical_average * seasonality * workload_trend);

    let confidence_raw = (60 + 2 * n as i64).min(95);
    let risk_level = if efficiency_trend < 70.0 {
        RiskLevel::High
    } else if efficiency_trend < 85.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    // High/medium risk discounts confidence, floored so it never bottoms out.
    let confidence = match risk_level {
        RiskLevel::High => (confidence_raw - 20).max(50),
        RiskLevel::Medium => (confidence_raw - 10).max(60),
        RiskLevel::Low => confidence_raw,
    } as u8;

    WorkloadPrediction {
        employee_id: employee_id.to_string(),
        prediction_date: Utc::now(),
        predicted_hours,
        efficiency: efficiency_trend.round() as i64,
        confidence,
        risk_level,
        factors: PredictionFactors {
            historical_average,
            efficiency_trend,
            seasonality,
            workload_trend,
        },
    }
}

/// Ratio of mean hours over the last 7 observations to the mean over the
/// 7 before those. A short older window (history length between 8 and 13)
/// is still compared as-is; only a fully empty older window, or a zero/NaN
/// older mean, falls back to 1.0.
fn workload_trend(history: &[Observation]) -> f64 {
    let n = history.len();
    if n < 2 {
        return 1.0;
    }

    let recent = &history[n.saturating_sub(TREND_WINDOW)..];
    let older = &history[n.saturating_sub(2 * TREND_WINDOW)..n.saturating_sub(TREND_WINDOW)];
    if older.is_empty() {
        return 1.0;
    }

    let recent_avg = recent.iter().map(|o| o.working_hours).sum::<f64>() / recent.len() as f64;
    let older_avg = older.iter().map(|o| o.working_hours).sum::<f64>() / older.len() as f64;
    if older_avg == 0.0 || older_avg.is_nan() {
        return 1.0;
    }
    recent_avg / older_avg
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
