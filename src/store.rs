use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::types::{NewWorkRecord, WorkRecord, WorkloadPrediction};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("record {0} not found")]
    NotFound(Uuid),
}

/// Read/write access to per-period work records. Injected into the HTTP
/// layer so handlers never touch process-global state.
pub trait WorkRecordStore: Send + Sync {
    fn create(&self, rec: NewWorkRecord) -> Result<WorkRecord, StoreError>;
    fn get(&self, id: Uuid) -> Result<WorkRecord, StoreError>;
    fn update(&self, id: Uuid, rec: NewWorkRecord) -> Result<WorkRecord, StoreError>;
    fn delete(&self, id: Uuid) -> Result<(), StoreError>;
    fn list(&self, employee_id: Option<&str>) -> Result<Vec<WorkRecord>, StoreError>;
    /// Up to `limit` most recent records for one employee, returned
    /// oldest-first — the ordering the estimator expects.
    fn recent_for_employee(
        &self,
        employee_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkRecord>, StoreError>;
}

/// Best-effort sink for computed predictions. A failed save must not fail
/// the prediction request.
pub trait PredictionStore: Send + Sync {
    fn save(&self, prediction: &WorkloadPrediction) -> Result<(), StoreError>;
    fn for_employee(&self, employee_id: &str) -> Result<Vec<WorkloadPrediction>, StoreError>;
}

fn build_record(rec: NewWorkRecord) -> WorkRecord {
    WorkRecord {
        id: Uuid::new_v4(),
        employee_id: rec.employee_id,
        date: rec.date,
        working_hours: rec.working_hours,
        efficiency: rec.efficiency,
    }
}

fn apply_update(existing: &mut WorkRecord, rec: NewWorkRecord) {
    existing.employee_id = rec.employee_id;
    existing.date = rec.date;
    existing.working_hours = rec.working_hours;
    existing.efficiency = rec.efficiency;
}

/// Tail of one employee's records sorted by date, oldest-first.
fn recent(records: &[WorkRecord], employee_id: &str, limit: usize) -> Vec<WorkRecord> {
    let mut matching: Vec<WorkRecord> = records
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .cloned()
        .collect();
    matching.sort_by_key(|r| r.date);
    let start = matching.len().saturating_sub(limit);
    matching.split_off(start)
}

fn filter_list(records: &[WorkRecord], employee_id: Option<&str>) -> Vec<WorkRecord> {
    match employee_id {
        Some(id) => records
            .iter()
            .filter(|r| r.employee_id == id)
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

// ---------- In-memory store ----------

/// Used when no data directory is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<WorkRecord>>,
    predictions: RwLock<Vec<WorkloadPrediction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkRecordStore for MemoryStore {
    fn create(&self, rec: NewWorkRecord) -> Result<WorkRecord, StoreError> {
        let record = build_record(rec);
        self.records.write().push(record.clone());
        Ok(record)
    }

    fn get(&self, id: Uuid) -> Result<WorkRecord, StoreError> {
        self.records
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: Uuid, rec: NewWorkRecord) -> Result<WorkRecord, StoreError> {
        let mut records = self.records.write();
        let existing = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        apply_update(existing, rec);
        Ok(existing.clone())
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn list(&self, employee_id: Option<&str>) -> Result<Vec<WorkRecord>, StoreError> {
        Ok(filter_list(&self.records.read(), employee_id))
    }

    fn recent_for_employee(
        &self,
        employee_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkRecord>, StoreError> {
        Ok(recent(&self.records.read(), employee_id, limit))
    }
}

impl PredictionStore for MemoryStore {
    fn save(&self, prediction: &WorkloadPrediction) -> Result<(), StoreError> {
        self.predictions.write().push(prediction.clone());
        Ok(())
    }

    fn for_employee(&self, employee_id: &str) -> Result<Vec<WorkloadPrediction>, StoreError> {
        Ok(self
            .predictions
            .read()
            .iter()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect())
    }
}

// ---------- JSON file store ----------

/// One JSON file per collection, read-modify-write on every mutation.
/// The lock only serializes access within this process; there is no
/// cross-process file locking.
pub struct JsonFileStore {
    records_path: PathBuf,
    predictions_path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = data_dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            records_path: dir.join("work_records.json"),
            predictions_path: dir.join("predictions.json"),
            lock: RwLock::new(()),
        })
    }

    fn load_records(&self) -> Result<Vec<WorkRecord>, StoreError> {
        if !self.records_path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.records_path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn store_records(&self, records: &[WorkRecord]) -> Result<(), StoreError> {
        fs::write(&self.records_path, serde_json::to_string_pretty(records)?)?;
        Ok(())
    }

    fn load_predictions(&self) -> Result<Vec<WorkloadPrediction>, StoreError> {
        if !self.predictions_path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.predictions_path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn store_predictions(&self, predictions: &[WorkloadPrediction]) -> Result<(), StoreError> {
        fs::write(
            &self.predictions_path,
            serde_json::to_string_pretty(predictions)?,
        )?;
        Ok(())
    }
}

impl WorkRecordStore for JsonFileStore {
    fn create(&self, rec: NewWorkRecord) -> Result<WorkRecord, StoreError> {
        let _guard = self.lock.write();
        let mut records = self.load_records()?;
        let record = build_record(rec);
        records.push(record.clone());
        self.store_records(&records)?;
        Ok(record)
    }

    fn get(&self, id: Uuid) -> Result<WorkRecord, StoreError> {
        let _guard = self.lock.read();
        self.load_records()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: Uuid, rec: NewWorkRecord) -> Result<WorkRecord, StoreError> {
        let _guard = self.lock.write();
        let mut records = self.load_records()?;
        let existing = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        apply_update(existing, rec);
        let updated = existing.clone();
        self.store_records(&records)?;
        Ok(updated)
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        let mut records = self.load_records()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.store_records(&records)
    }

    fn list(&self, employee_id: Option<&str>) -> Result<Vec<WorkRecord>, StoreError> {
        let _guard = self.lock.read();
        Ok(filter_list(&self.load_records()?, employee_id))
    }

    fn recent_for_employee(
        &self,
        employee_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkRecord>, StoreError> {
        let _guard = self.lock.read();
        Ok(recent(&self.load_records()?, employee_id, limit))
    }
}

impl PredictionStore for JsonFileStore {
    fn save(&self, prediction: &WorkloadPrediction) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        let mut predictions = self.load_predictions()?;
        predictions.push(prediction.clone());
        self.store_predictions(&predictions)
    }

    fn for_employee(&self, employee_id: &str) -> Result<Vec<WorkloadPrediction>, StoreError> {
        let _guard = self.lock.read();
        Ok(self
            .load_predictions()?
            .into_iter()
            .filter(|p| p.employee_id == employee_id)
            .collect())
    }
}
