//! View-ready structures produced by the dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{format_jc_index, JcMeasurement, RiskTier};

/// Chart title for the JC Index trend.
pub const TREND_CHART_TITLE: &str = "JC Index Over Time";

/// Fixed y axis range for the JC Index trend.
pub const TREND_Y_AXIS_RANGE: (f64, f64) = (0.0, 6.0);

/// Summary tab contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub patient_id: String,
    /// Infusions recorded so far
    pub infusion_count: usize,
    /// Most recent measurement by date
    pub latest_measurement: Option<JcMeasurement>,
    /// Planned course length
    pub total_expected: u32,
    pub registry_id: String,
}

impl DashboardSummary {
    /// Treatment progress, e.g. "Infusion 4 of 14".
    pub fn progress_label(&self) -> String {
        format!("Infusion {} of {}", self.infusion_count, self.total_expected)
    }
}

/// Risk status derived from the latest measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskBanner {
    /// No measurements recorded yet
    NoData,
    Status {
        tier: RiskTier,
        jc_index: f64,
        date: NaiveDate,
    },
}

impl RiskBanner {
    pub fn tier(&self) -> Option<RiskTier> {
        match self {
            RiskBanner::NoData => None,
            RiskBanner::Status { tier, .. } => Some(*tier),
        }
    }

    /// Banner text, e.g. "🔴 High Risk - Current JC Index: 4.5".
    pub fn message(&self) -> String {
        match self {
            RiskBanner::NoData => "No JC Index data yet".to_string(),
            RiskBanner::Status { tier, jc_index, .. } => format!(
                "{} {} Risk - Current JC Index: {}",
                tier.indicator(),
                tier.label(),
                format_jc_index(*jc_index)
            ),
        }
    }
}

/// Data and layout for the JC Index trend chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// (min, max)
    pub y_range: (f64, f64),
    /// Oldest first
    pub points: Vec<JcMeasurement>,
}

impl TrendChart {
    pub fn new(points: Vec<JcMeasurement>) -> Self {
        Self {
            title: TREND_CHART_TITLE.to_string(),
            x_axis_title: "Date".to_string(),
            y_axis_title: "JC Index".to_string(),
            y_range: TREND_Y_AXIS_RANGE,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_label() {
        let summary = DashboardSummary {
            patient_id: "P1".into(),
            infusion_count: 4,
            latest_measurement: None,
            total_expected: 14,
            registry_id: "123445".into(),
        };
        assert_eq!(summary.progress_label(), "Infusion 4 of 14");
    }

    #[test]
    fn test_banner_messages() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 27).unwrap();
        let high = RiskBanner::Status { tier: RiskTier::High, jc_index: 4.5, date };
        assert_eq!(high.message(), "🔴 High Risk - Current JC Index: 4.5");

        let medium = RiskBanner::Status { tier: RiskTier::Medium, jc_index: 3.5, date };
        assert_eq!(medium.message(), "🟡 Medium Risk - Current JC Index: 3.5");

        assert_eq!(RiskBanner::NoData.tier(), None);
    }

    #[test]
    fn test_banner_serializes_tagged() {
        let json = serde_json::to_value(RiskBanner::NoData).unwrap();
        assert_eq!(json["kind"], "no_data");
    }

    #[test]
    fn test_empty_chart_keeps_layout() {
        let chart = TrendChart::new(Vec::new());
        assert!(chart.is_empty());
        assert_eq!(chart.title, "JC Index Over Time");
        assert_eq!(chart.y_range, (0.0, 6.0));
    }
}
