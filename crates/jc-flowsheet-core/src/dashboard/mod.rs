//! Dashboard aggregation over the record store.
//!
//! Stateless: every call re-reads the store, so views always reflect the
//! latest writes.

mod views;

pub use views::*;

use crate::config::{FlowsheetConfig, DEFAULT_REGISTRY_ID, DEFAULT_TOTAL_EXPECTED_INFUSIONS};
use crate::models::{classify_risk, Infusion, JcMeasurement};
use crate::store::{RecordStore, StoreResult};

/// Static values shown alongside store-derived data.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub registry_id: String,
    pub total_expected_infusions: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            registry_id: DEFAULT_REGISTRY_ID.to_string(),
            total_expected_infusions: DEFAULT_TOTAL_EXPECTED_INFUSIONS,
        }
    }
}

impl From<&FlowsheetConfig> for DashboardSettings {
    fn from(config: &FlowsheetConfig) -> Self {
        Self {
            registry_id: config.registry_id.clone(),
            total_expected_infusions: config.total_expected_infusions,
        }
    }
}

/// Builds view structures from a record store.
pub struct Dashboard<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    settings: DashboardSettings,
}

impl<'a, S: RecordStore + ?Sized> Dashboard<'a, S> {
    /// Create a dashboard with default settings.
    pub fn new(store: &'a S) -> Self {
        Self::with_settings(store, DashboardSettings::default())
    }

    pub fn with_settings(store: &'a S, settings: DashboardSettings) -> Self {
        Self { store, settings }
    }

    /// Summary tab: progress, latest measurement, registry.
    pub fn summary(&self, patient_id: &str) -> StoreResult<DashboardSummary> {
        let infusion_count = self.store.list_infusions(patient_id)?.len();
        let latest_measurement = self.latest_measurement(patient_id)?;

        Ok(DashboardSummary {
            patient_id: patient_id.to_string(),
            infusion_count,
            latest_measurement,
            total_expected: self.settings.total_expected_infusions,
            registry_id: self.settings.registry_id.clone(),
        })
    }

    /// Risk status from the latest measurement, or [`RiskBanner::NoData`].
    pub fn risk_banner(&self, patient_id: &str) -> StoreResult<RiskBanner> {
        let banner = match self.latest_measurement(patient_id)? {
            Some(latest) => RiskBanner::Status {
                tier: classify_risk(latest.jc_index),
                jc_index: latest.jc_index,
                date: latest.date,
            },
            None => RiskBanner::NoData,
        };
        tracing::debug!(patient_id, tier = ?banner.tier(), "Computed risk banner");
        Ok(banner)
    }

    /// Measurements oldest first, for left-to-right charting.
    ///
    /// Exactly the reverse of [`RecordStore::list_jc_measurements`].
    pub fn trend_series(&self, patient_id: &str) -> StoreResult<Vec<JcMeasurement>> {
        let mut series = self.store.list_jc_measurements(patient_id)?;
        series.reverse();
        Ok(series)
    }

    /// Trend series with chart layout.
    pub fn trend_chart(&self, patient_id: &str) -> StoreResult<TrendChart> {
        Ok(TrendChart::new(self.trend_series(patient_id)?))
    }

    /// Infusion history, most recent first.
    pub fn infusion_timeline(&self, patient_id: &str) -> StoreResult<Vec<Infusion>> {
        self.store.list_infusions(patient_id)
    }

    fn latest_measurement(&self, patient_id: &str) -> StoreResult<Option<JcMeasurement>> {
        Ok(self
            .store
            .list_jc_measurements(patient_id)?
            .into_iter()
            .next())
    }
}
