//! Per-patient export backed by the record store.

use serde::{Deserialize, Serialize};

use super::csv::{infusions_to_csv, jc_measurements_to_csv};
use crate::models::{Infusion, JcMeasurement};
use crate::store::{RecordStore, StoreResult};

/// Full record set for one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientExport {
    pub patient_id: String,
    /// Export timestamp
    pub exported_at: String,
    /// Most recent first
    pub infusions: Vec<Infusion>,
    /// Most recent first
    pub jc_measurements: Vec<JcMeasurement>,
}

impl PatientExport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Patient exporter.
pub struct PatientExporter<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> PatientExporter<'a, S> {
    /// Create a new patient exporter.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Infusion history as CSV, most recent first.
    pub fn infusions_csv(&self, patient_id: &str) -> StoreResult<String> {
        let infusions = self.store.list_infusions(patient_id)?;
        tracing::info!(patient_id, rows = infusions.len(), "Exported infusions CSV");
        Ok(infusions_to_csv(&infusions))
    }

    /// JC Index history as CSV, most recent first.
    pub fn jc_measurements_csv(&self, patient_id: &str) -> StoreResult<String> {
        let measurements = self.store.list_jc_measurements(patient_id)?;
        tracing::info!(patient_id, rows = measurements.len(), "Exported JC Index CSV");
        Ok(jc_measurements_to_csv(&measurements))
    }

    /// Everything recorded for the patient.
    pub fn export(&self, patient_id: &str) -> StoreResult<PatientExport> {
        Ok(PatientExport {
            patient_id: patient_id.to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            infusions: self.store.list_infusions(patient_id)?,
            jc_measurements: self.store.list_jc_measurements(patient_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_csv_follows_store_order() {
        let store = MemoryStore::new();
        store.seed_if_empty("P1").unwrap();

        let exporter = PatientExporter::new(&store);
        let csv = exporter.infusions_csv("P1").unwrap();
        let ids: Vec<&str> = csv
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .collect();

        assert_eq!(ids, vec!["21", "20", "19", "18"]);
    }

    #[test]
    fn test_json_export() {
        let store = MemoryStore::new();
        store.seed_if_empty("P1").unwrap();

        let export = PatientExporter::new(&store).export("P1").unwrap();
        assert_eq!(export.infusions.len(), 4);
        assert_eq!(export.jc_measurements.len(), 6);

        let json = export.to_json().unwrap();
        assert!(json.contains("\"dose\": \"910 mg\""));
        assert!(json.contains("\"type\": \"Follow-up\""));

        let parsed: PatientExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_unknown_patient_exports_headers_only() {
        let store = MemoryStore::new();
        let exporter = PatientExporter::new(&store);
        assert_eq!(exporter.jc_measurements_csv("nobody").unwrap().lines().count(), 1);
    }
}
