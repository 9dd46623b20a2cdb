//! Record store: patient-scoped persistence of infusions and JC measurements.
//!
//! Two backends implement [`RecordStore`]:
//!
//! - [`SqliteStore`]: file-backed; opens a connection per operation.
//! - [`MemoryStore`]: session-scoped; records live as long as the instance.

mod memory;
mod seed;
mod sqlite;

pub use memory::*;
pub use seed::*;
pub use sqlite::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{Infusion, JcMeasurement, NewInfusion, NewJcMeasurement};

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Infusion #{id} already exists for patient {patient_id}")]
    DuplicateInfusion { patient_id: String, id: u32 },

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Number of records inserted by [`RecordStore::seed_if_empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub infusions: usize,
    pub jc_measurements: usize,
}

impl SeedReport {
    /// True if nothing was inserted.
    pub fn is_noop(&self) -> bool {
        self.infusions == 0 && self.jc_measurements == 0
    }
}

/// Insert-only, patient-scoped storage for flowsheet records.
///
/// Lists are returned most recent date first; records sharing a date are
/// ordered newest insertion first. An unknown patient yields empty lists.
pub trait RecordStore {
    /// Ensure the underlying storage exists. Idempotent.
    fn initialize(&self) -> StoreResult<()>;

    /// Append an infusion. Infusion numbers are unique per patient.
    fn add_infusion(&self, patient_id: &str, infusion: &NewInfusion) -> StoreResult<Infusion>;

    /// Append a JC measurement; the store assigns its ID.
    fn add_jc_measurement(
        &self,
        patient_id: &str,
        measurement: &NewJcMeasurement,
    ) -> StoreResult<JcMeasurement>;

    /// All infusions for a patient, descending by date.
    fn list_infusions(&self, patient_id: &str) -> StoreResult<Vec<Infusion>>;

    /// All JC measurements for a patient, descending by date.
    fn list_jc_measurements(&self, patient_id: &str) -> StoreResult<Vec<JcMeasurement>>;

    /// Suggested number for the next infusion: highest recorded plus one.
    fn next_infusion_number(&self, patient_id: &str) -> StoreResult<u32> {
        let max = self
            .list_infusions(patient_id)?
            .iter()
            .map(|infusion| infusion.id)
            .max();
        Ok(max.map_or(1, |id| id.saturating_add(1)))
    }

    /// Insert bootstrap records for a patient.
    ///
    /// Infusions and measurements are checked independently: each set is
    /// only inserted if the patient has no records of that kind.
    fn seed_if_empty(&self, patient_id: &str) -> StoreResult<SeedReport> {
        let mut report = SeedReport::default();

        if self.list_infusions(patient_id)?.is_empty() {
            for infusion in bootstrap_infusions() {
                self.add_infusion(patient_id, &infusion)?;
                report.infusions += 1;
            }
        }

        if self.list_jc_measurements(patient_id)?.is_empty() {
            for measurement in bootstrap_jc_measurements() {
                self.add_jc_measurement(patient_id, &measurement)?;
                report.jc_measurements += 1;
            }
        }

        log_seeded(patient_id, &report);
        Ok(report)
    }
}

fn log_seeded(patient_id: &str, report: &SeedReport) {
    if !report.is_noop() {
        tracing::info!(
            patient_id,
            infusions = report.infusions,
            jc_measurements = report.jc_measurements,
            "Seeded bootstrap records"
        );
    }
}
