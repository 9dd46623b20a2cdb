//! Session-scoped in-memory record store.

use std::sync::{Mutex, MutexGuard};

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{Infusion, JcMeasurement, NewInfusion, NewJcMeasurement};

/// In-memory record store.
///
/// Records live exactly as long as the instance; create one per session
/// and drop it when the session ends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Insertion order
    infusions: Vec<Infusion>,
    /// Insertion order
    jc_measurements: Vec<JcMeasurement>,
    last_jc_id: i64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

/// Newest insertion first, then stable sort by date descending.
fn newest_first<T: Clone>(
    records: &[T],
    belongs: impl Fn(&T) -> bool,
    date: impl Fn(&T) -> chrono::NaiveDate,
) -> Vec<T> {
    let mut selected: Vec<T> = records.iter().rev().filter(|r| belongs(r)).cloned().collect();
    selected.sort_by(|a, b| date(b).cmp(&date(a)));
    selected
}

impl RecordStore for MemoryStore {
    fn initialize(&self) -> StoreResult<()> {
        self.state().map(drop)
    }

    fn add_infusion(&self, patient_id: &str, infusion: &NewInfusion) -> StoreResult<Infusion> {
        let mut state = self.state()?;

        let duplicate = state
            .infusions
            .iter()
            .any(|existing| existing.patient_id == patient_id && existing.id == infusion.id());
        if duplicate {
            tracing::warn!(patient_id, id = infusion.id(), "Rejected duplicate infusion number");
            return Err(StoreError::DuplicateInfusion {
                patient_id: patient_id.to_string(),
                id: infusion.id(),
            });
        }

        let record = Infusion::from_new(patient_id, infusion);
        state.infusions.push(record.clone());
        tracing::info!(patient_id, id = record.id, "Recorded infusion");
        Ok(record)
    }

    fn add_jc_measurement(
        &self,
        patient_id: &str,
        measurement: &NewJcMeasurement,
    ) -> StoreResult<JcMeasurement> {
        let mut state = self.state()?;
        state.last_jc_id += 1;

        let record = JcMeasurement::from_new(state.last_jc_id, patient_id, measurement);
        state.jc_measurements.push(record.clone());
        tracing::info!(patient_id, id = record.id, jc_index = record.jc_index, "Recorded JC measurement");
        Ok(record)
    }

    fn list_infusions(&self, patient_id: &str) -> StoreResult<Vec<Infusion>> {
        let state = self.state()?;
        Ok(newest_first(
            state.infusions.as_slice(),
            |i| i.patient_id == patient_id,
            |i| i.date,
        ))
    }

    fn list_jc_measurements(&self, patient_id: &str) -> StoreResult<Vec<JcMeasurement>> {
        let state = self.state()?;
        Ok(newest_first(
            state.jc_measurements.as_slice(),
            |m| m.patient_id == patient_id,
            |m| m.date,
        ))
    }
}
