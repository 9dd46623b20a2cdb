//! JC Flowsheet Core Library
//!
//! Single-patient tracking of drug infusions and JC Index measurements,
//! with risk classification and dashboard aggregation.
//!
//! # Architecture
//!
//! ```text
//!                 Presentation layer (forms, tabs, charts)
//!                                   │
//!                         FlowsheetCore (FFI)
//!                     validates input at the boundary
//!                                   │
//!               ┌───────────────────┼───────────────────┐
//!               │                   │                   │
//!               ▼                   ▼                   ▼
//!           Dashboard            Export          Risk Classifier
//!     summary / banner / trend   CSV, JSON        Low/Medium/High
//!               │                   │
//!               └─────────┬─────────┘
//!                         ▼
//!                    RecordStore
//!            ┌────────────┴────────────┐
//!            ▼                         ▼
//!       SqliteStore               MemoryStore
//!   (connection per call)      (session lifetime)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite schema and per-table queries
//! - [`models`]: Domain types (Infusion, JcMeasurement, RiskTier) and validation
//! - [`store`]: Record store trait and backends
//! - [`dashboard`]: View aggregation
//! - [`export`]: CSV and JSON export
//! - [`config`]: Configuration

pub mod config;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::FlowsheetConfig;
pub use dashboard::{Dashboard, DashboardSettings, DashboardSummary, RiskBanner, TrendChart};
pub use db::Database;
pub use models::{
    classify_risk, Infusion, InfusionStatus, JcMeasurement, MeasurementType, NewInfusion,
    NewJcMeasurement, RiskTier, ValidationError,
};
pub use store::{MemoryStore, RecordStore, SqliteStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FlowsheetError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ValidationError> for FlowsheetError {
    fn from(e: ValidationError) -> Self {
        FlowsheetError::Validation(e.to_string())
    }
}

impl From<StoreError> for FlowsheetError {
    fn from(e: StoreError) -> Self {
        match e {
            // Duplicate numbers are corrected by the user like any other input error
            StoreError::DuplicateInfusion { .. } => FlowsheetError::Validation(e.to_string()),
            other => FlowsheetError::Storage(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for FlowsheetError {
    fn from(e: config::ConfigError) -> Self {
        FlowsheetError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for FlowsheetError {
    fn from(e: serde_json::Error) -> Self {
        FlowsheetError::Serialization(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install a `tracing` subscriber. Returns false if one was already set.
///
/// `filter` uses `EnvFilter` syntax; `RUST_LOG` wins when set.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    let default_filter = filter.unwrap_or_else(|| config::default_log_filter().to_string());
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("JC flowsheet core v{}", config::APP_VERSION);
    }
    installed
}

/// Open or create a flowsheet database at the given path.
#[uniffi::export]
pub fn open_flowsheet(path: String) -> Result<Arc<FlowsheetCore>, FlowsheetError> {
    let config = FlowsheetConfig {
        database_path: Some(path.into()),
        ..FlowsheetConfig::default()
    };
    FlowsheetCore::from_config(config)
}

/// Create a session-scoped in-memory flowsheet.
#[uniffi::export]
pub fn open_flowsheet_in_memory() -> Result<Arc<FlowsheetCore>, FlowsheetError> {
    FlowsheetCore::from_config(FlowsheetConfig::default())
}

/// Open a flowsheet from a JSON configuration document.
#[uniffi::export]
pub fn open_flowsheet_with_config(config_json: String) -> Result<Arc<FlowsheetCore>, FlowsheetError> {
    let config = FlowsheetConfig::from_json_str(&config_json)?;
    FlowsheetCore::from_config(config)
}

/// Classify a JC Index value.
#[uniffi::export]
pub fn classify_jc_index(jc_index: f64) -> FfiRiskTier {
    classify_risk(jc_index).into()
}

/// Risk legend, lowest tier first.
#[uniffi::export]
pub fn risk_legend() -> Vec<FfiRiskLegendEntry> {
    RiskTier::legend()
        .iter()
        .map(|tier| FfiRiskLegendEntry {
            tier: (*tier).into(),
            label: tier.label().to_string(),
            indicator: tier.indicator().to_string(),
            range: tier.range_label().to_string(),
        })
        .collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Flowsheet handle for the presentation layer.
///
/// Every method takes a patient ID; input payloads are validated here before
/// they reach the store.
#[derive(uniffi::Object)]
pub struct FlowsheetCore {
    store: Box<dyn RecordStore + Send + Sync>,
    settings: DashboardSettings,
    default_patient_id: String,
}

impl FlowsheetCore {
    fn from_config(config: FlowsheetConfig) -> Result<Arc<Self>, FlowsheetError> {
        let store = config.open_store()?;
        Ok(Arc::new(Self {
            store,
            settings: DashboardSettings::from(&config),
            default_patient_id: config.default_patient_id,
        }))
    }

    fn dashboard(&self) -> Dashboard<'_, dyn RecordStore + Send + Sync> {
        Dashboard::with_settings(self.store.as_ref(), self.settings.clone())
    }
}

#[uniffi::export]
impl FlowsheetCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Patient ID to preselect in the UI.
    pub fn default_patient_id(&self) -> String {
        self.default_patient_id.clone()
    }

    /// Insert bootstrap records for a patient with no history.
    pub fn seed_if_empty(&self, patient_id: String) -> Result<FfiSeedReport, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let report = self.store.seed_if_empty(&patient_id)?;
        Ok(report.into())
    }

    /// Record an infusion.
    pub fn add_infusion(
        &self,
        patient_id: String,
        infusion: FfiNewInfusion,
    ) -> Result<FfiInfusion, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let new = NewInfusion::try_from(infusion).inspect_err(|e| {
            tracing::warn!(patient_id = %patient_id, "Rejected infusion: {e}");
        })?;
        let stored = self.store.add_infusion(&patient_id, &new)?;
        Ok(stored.into())
    }

    /// Record a JC Index measurement.
    pub fn add_jc_measurement(
        &self,
        patient_id: String,
        measurement: FfiNewJcMeasurement,
    ) -> Result<FfiJcMeasurement, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let new = NewJcMeasurement::try_from(measurement).inspect_err(|e| {
            tracing::warn!(patient_id = %patient_id, "Rejected JC measurement: {e}");
        })?;
        let stored = self.store.add_jc_measurement(&patient_id, &new)?;
        Ok(stored.into())
    }

    /// Infusions, most recent first.
    pub fn list_infusions(&self, patient_id: String) -> Result<Vec<FfiInfusion>, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let infusions = self.store.list_infusions(&patient_id)?;
        Ok(infusions.into_iter().map(|i| i.into()).collect())
    }

    /// JC measurements, most recent first.
    pub fn list_jc_measurements(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiJcMeasurement>, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let measurements = self.store.list_jc_measurements(&patient_id)?;
        Ok(measurements.into_iter().map(|m| m.into()).collect())
    }

    /// Default for the infusion number field.
    pub fn next_infusion_number(&self, patient_id: String) -> Result<u32, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        Ok(self.store.next_infusion_number(&patient_id)?)
    }

    // =========================================================================
    // Dashboard Operations
    // =========================================================================

    /// Summary tab.
    pub fn summary(&self, patient_id: String) -> Result<FfiSummary, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let summary = self.dashboard().summary(&patient_id)?;
        Ok(summary.into())
    }

    /// Risk banner for the latest measurement.
    pub fn risk_banner(&self, patient_id: String) -> Result<FfiRiskBanner, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let banner = self.dashboard().risk_banner(&patient_id)?;
        Ok(banner.into())
    }

    /// JC measurements, oldest first.
    pub fn trend_series(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiJcMeasurement>, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let series = self.dashboard().trend_series(&patient_id)?;
        Ok(series.into_iter().map(|m| m.into()).collect())
    }

    /// Trend series with chart layout.
    pub fn trend_chart(&self, patient_id: String) -> Result<FfiTrendChart, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let chart = self.dashboard().trend_chart(&patient_id)?;
        Ok(chart.into())
    }

    /// Infusion history, most recent first.
    pub fn infusion_timeline(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiInfusion>, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let timeline = self.dashboard().infusion_timeline(&patient_id)?;
        Ok(timeline.into_iter().map(|i| i.into()).collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export infusions as CSV.
    pub fn export_infusions_csv(&self, patient_id: String) -> Result<FfiCsvFile, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let exporter = export::PatientExporter::new(self.store.as_ref());
        Ok(FfiCsvFile {
            file_name: export::infusions_file_name(&patient_id),
            contents: exporter.infusions_csv(&patient_id)?,
        })
    }

    /// Export JC measurements as CSV.
    pub fn export_jc_measurements_csv(
        &self,
        patient_id: String,
    ) -> Result<FfiCsvFile, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let exporter = export::PatientExporter::new(self.store.as_ref());
        Ok(FfiCsvFile {
            file_name: export::jc_measurements_file_name(&patient_id),
            contents: exporter.jc_measurements_csv(&patient_id)?,
        })
    }

    /// Export all of a patient's records as JSON.
    pub fn export_json(&self, patient_id: String) -> Result<String, FlowsheetError> {
        let patient_id = models::validate_patient_id(&patient_id)?;
        let exporter = export::PatientExporter::new(self.store.as_ref());
        Ok(exporter.export(&patient_id)?.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiRiskTier {
    Low,
    Medium,
    High,
}

impl From<RiskTier> for FfiRiskTier {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => FfiRiskTier::Low,
            RiskTier::Medium => FfiRiskTier::Medium,
            RiskTier::High => FfiRiskTier::High,
        }
    }
}

/// FFI-safe legend entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRiskLegendEntry {
    pub tier: FfiRiskTier,
    pub label: String,
    pub indicator: String,
    pub range: String,
}

/// FFI-safe infusion payload. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewInfusion {
    pub id: i64,
    pub date: String,
    pub weight_kg: i64,
    pub notes: Option<String>,
}

impl TryFrom<FfiNewInfusion> for NewInfusion {
    type Error = ValidationError;

    fn try_from(input: FfiNewInfusion) -> Result<Self, Self::Error> {
        let date = models::parse_date(&input.date)?;
        NewInfusion::new(input.id, date, input.weight_kg, input.notes.unwrap_or_default())
    }
}

/// FFI-safe JC measurement payload. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewJcMeasurement {
    pub date: String,
    pub jc_index: f64,
    /// "Baseline" or "Follow-up"
    pub measurement_type: String,
    pub notes: Option<String>,
}

impl TryFrom<FfiNewJcMeasurement> for NewJcMeasurement {
    type Error = ValidationError;

    fn try_from(input: FfiNewJcMeasurement) -> Result<Self, Self::Error> {
        let date = models::parse_date(&input.date)?;
        let kind: MeasurementType = input.measurement_type.parse()?;
        NewJcMeasurement::new(date, input.jc_index, kind, input.notes.unwrap_or_default())
    }
}

/// FFI-safe infusion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInfusion {
    pub id: u32,
    pub patient_id: String,
    pub date: String,
    pub weight_kg: u32,
    pub dose: String,
    pub volume: String,
    pub status: String,
    pub notes: String,
}

impl From<Infusion> for FfiInfusion {
    fn from(infusion: Infusion) -> Self {
        Self {
            id: infusion.id,
            patient_id: infusion.patient_id,
            date: infusion.date.to_string(),
            weight_kg: infusion.weight,
            dose: infusion.dose,
            volume: infusion.volume,
            status: infusion.status.as_str().to_string(),
            notes: infusion.notes,
        }
    }
}

/// FFI-safe JC measurement.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiJcMeasurement {
    pub id: i64,
    pub patient_id: String,
    pub date: String,
    pub jc_index: f64,
    pub measurement_type: String,
    pub notes: String,
    pub risk_tier: FfiRiskTier,
}

impl From<JcMeasurement> for FfiJcMeasurement {
    fn from(m: JcMeasurement) -> Self {
        let risk_tier = m.risk_tier().into();
        Self {
            id: m.id,
            patient_id: m.patient_id,
            date: m.date.to_string(),
            jc_index: m.jc_index,
            measurement_type: m.kind.as_str().to_string(),
            notes: m.notes,
            risk_tier,
        }
    }
}

/// FFI-safe seed report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSeedReport {
    pub infusions: u32,
    pub jc_measurements: u32,
}

impl From<store::SeedReport> for FfiSeedReport {
    fn from(report: store::SeedReport) -> Self {
        Self {
            infusions: report.infusions as u32,
            jc_measurements: report.jc_measurements as u32,
        }
    }
}

/// FFI-safe summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummary {
    pub patient_id: String,
    pub infusion_count: u32,
    pub total_expected: u32,
    pub progress_label: String,
    pub latest_measurement: Option<FfiJcMeasurement>,
    pub registry_id: String,
}

impl From<DashboardSummary> for FfiSummary {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            progress_label: summary.progress_label(),
            patient_id: summary.patient_id,
            infusion_count: summary.infusion_count as u32,
            total_expected: summary.total_expected,
            latest_measurement: summary.latest_measurement.map(|m| m.into()),
            registry_id: summary.registry_id,
        }
    }
}

/// FFI-safe risk banner.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiRiskBanner {
    NoData,
    Status {
        tier: FfiRiskTier,
        jc_index: f64,
        date: String,
        message: String,
    },
}

impl From<RiskBanner> for FfiRiskBanner {
    fn from(banner: RiskBanner) -> Self {
        let message = banner.message();
        match banner {
            RiskBanner::NoData => FfiRiskBanner::NoData,
            RiskBanner::Status { tier, jc_index, date } => FfiRiskBanner::Status {
                tier: tier.into(),
                jc_index,
                date: date.to_string(),
                message,
            },
        }
    }
}

/// FFI-safe trend chart.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTrendChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub y_min: f64,
    pub y_max: f64,
    pub points: Vec<FfiJcMeasurement>,
}

impl From<TrendChart> for FfiTrendChart {
    fn from(chart: TrendChart) -> Self {
        Self {
            title: chart.title,
            x_axis_title: chart.x_axis_title,
            y_axis_title: chart.y_axis_title,
            y_min: chart.y_range.0,
            y_max: chart.y_range.1,
            points: chart.points.into_iter().map(|m| m.into()).collect(),
        }
    }
}

/// FFI-safe CSV download.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCsvFile {
    pub file_name: String,
    pub contents: String,
}
