//! File-backed record store.

use std::path::{Path, PathBuf};

use super::{
    bootstrap_infusions, bootstrap_jc_measurements, log_seeded, RecordStore, SeedReport,
    StoreError, StoreResult,
};
use crate::db::{Database, DbError};
use crate::models::{Infusion, JcMeasurement, NewInfusion, NewJcMeasurement};

/// SQLite record store.
///
/// Holds only the database path. Each operation opens its own connection
/// and drops it before returning, so no handle or transaction outlives a
/// single call.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the
    /// schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.initialize()?;
        tracing::info!(path = %store.path.display(), "Opened flowsheet database");
        Ok(store)
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Plain connection for data operations; the schema is applied by
    /// [`RecordStore::initialize`].
    fn connect(&self) -> StoreResult<Database> {
        Ok(Database::connect(&self.path)?)
    }
}

fn insert_infusion(db: &Database, patient_id: &str, infusion: &NewInfusion) -> StoreResult<Infusion> {
    let record = Infusion::from_new(patient_id, infusion);

    match db.insert_infusion(&record) {
        Ok(()) => {
            tracing::info!(patient_id, id = record.id, "Recorded infusion");
            Ok(record)
        }
        Err(DbError::Constraint(_)) => {
            tracing::warn!(patient_id, id = record.id, "Rejected duplicate infusion number");
            Err(StoreError::DuplicateInfusion {
                patient_id: patient_id.to_string(),
                id: record.id,
            })
        }
        Err(e) => Err(e.into()),
    }
}

impl RecordStore for SqliteStore {
    fn initialize(&self) -> StoreResult<()> {
        Database::open(&self.path)?;
        Ok(())
    }

    fn add_infusion(&self, patient_id: &str, infusion: &NewInfusion) -> StoreResult<Infusion> {
        let db = self.connect()?;
        insert_infusion(&db, patient_id, infusion)
    }

    fn add_jc_measurement(
        &self,
        patient_id: &str,
        measurement: &NewJcMeasurement,
    ) -> StoreResult<JcMeasurement> {
        let db = self.connect()?;
        let record = db.insert_jc_measurement(patient_id, measurement)?;
        tracing::info!(patient_id, id = record.id, jc_index = record.jc_index, "Recorded JC measurement");
        Ok(record)
    }

    fn list_infusions(&self, patient_id: &str) -> StoreResult<Vec<Infusion>> {
        let db = self.connect()?;
        let infusions = db.list_infusions(patient_id)?;
        tracing::debug!(patient_id, count = infusions.len(), "Listed infusions");
        Ok(infusions)
    }

    fn list_jc_measurements(&self, patient_id: &str) -> StoreResult<Vec<JcMeasurement>> {
        let db = self.connect()?;
        let measurements = db.list_jc_measurements(patient_id)?;
        tracing::debug!(patient_id, count = measurements.len(), "Listed JC measurements");
        Ok(measurements)
    }

    fn next_infusion_number(&self, patient_id: &str) -> StoreResult<u32> {
        let db = self.connect()?;
        let max = db.max_infusion_number(patient_id)?;
        Ok(max.map_or(1, |id| id.saturating_add(1)))
    }

    /// Both empty checks and every bootstrap insert share one transaction,
    /// so a failure leaves the patient exactly as it was.
    fn seed_if_empty(&self, patient_id: &str) -> StoreResult<SeedReport> {
        let db = self.connect()?;

        let report = db.in_transaction(|db| -> StoreResult<SeedReport> {
            let mut report = SeedReport::default();

            if db.count_infusions(patient_id)? == 0 {
                for infusion in bootstrap_infusions() {
                    insert_infusion(db, patient_id, &infusion)?;
                    report.infusions += 1;
                }
            }

            if db.count_jc_measurements(patient_id)? == 0 {
                for measurement in bootstrap_jc_measurements() {
                    db.insert_jc_measurement(patient_id, &measurement)?;
                    report.jc_measurements += 1;
                }
            }

            Ok(report)
        })?;

        log_seeded(patient_id, &report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("flowsheet.db")).unwrap();
        (dir, store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_creates_file() {
        let (_dir, store) = setup_store();
        assert!(store.path().exists());
        assert!(store.initialize().is_ok());
    }

    #[test]
    fn test_records_survive_reopen() {
        let (dir, store) = setup_store();
        let new = NewInfusion::new(22, date(2025, 9, 1), 80, "").unwrap();
        store.add_infusion("P1", &new).unwrap();
        drop(store);

        let reopened = SqliteStore::open(dir.path().join("flowsheet.db")).unwrap();
        let infusions = reopened.list_infusions("P1").unwrap();
        assert_eq!(infusions.len(), 1);
        assert_eq!(infusions[0].dose, "800 mg");
    }

    #[test]
    fn test_duplicate_infusion_maps_to_store_error() {
        let (_dir, store) = setup_store();
        let new = NewInfusion::new(5, date(2025, 9, 1), 80, "").unwrap();
        store.add_infusion("P1", &new).unwrap();

        let result = store.add_infusion("P1", &new);
        assert!(matches!(
            result,
            Err(StoreError::DuplicateInfusion { id: 5, .. })
        ));
    }

    #[test]
    fn test_next_infusion_number() {
        let (_dir, store) = setup_store();
        assert_eq!(store.next_infusion_number("P1").unwrap(), 1);

        store.seed_if_empty("P1").unwrap();
        assert_eq!(store.next_infusion_number("P1").unwrap(), 22);
    }

    fn block_infusion(store: &SqliteStore, number: u32) {
        let db = Database::connect(store.path()).unwrap();
        db.conn()
            .execute_batch(&format!(
                "CREATE TRIGGER block_infusion BEFORE INSERT ON infusions
                 WHEN NEW.infusion_number = {number}
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;"
            ))
            .unwrap();
    }

    fn unblock_infusion(store: &SqliteStore) {
        let db = Database::connect(store.path()).unwrap();
        db.conn().execute_batch("DROP TRIGGER block_infusion").unwrap();
    }

    #[test]
    fn test_failed_seed_leaves_nothing_behind() {
        let (_dir, store) = setup_store();
        block_infusion(&store, 20);

        let result = store.seed_if_empty("P1");
        assert!(matches!(result, Err(StoreError::Database(_))));

        let db = Database::connect(store.path()).unwrap();
        assert_eq!(db.count_infusions("P1").unwrap(), 0);
        assert_eq!(db.count_jc_measurements("P1").unwrap(), 0);

        unblock_infusion(&store);
        let report = store.seed_if_empty("P1").unwrap();
        assert_eq!(report, SeedReport { infusions: 4, jc_measurements: 6 });
        assert_eq!(db.count_infusions("P1").unwrap(), 4);
    }

    #[test]
    fn test_non_unique_failure_is_not_duplicate() {
        let (_dir, store) = setup_store();
        block_infusion(&store, 7);

        let new = NewInfusion::new(7, date(2025, 9, 1), 80, "").unwrap();
        let result = store.add_infusion("P1", &new);
        assert!(matches!(result, Err(StoreError::Database(DbError::Sqlite(_)))));
    }

    #[test]
    fn test_unwritable_location_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteStore::open(dir.path().join("missing").join("flowsheet.db"));
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
