//! JC Index measurement models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::risk::{classify_risk, RiskTier};
use super::validation::{notes_or_default, validate_jc_index, ValidationError, ValidationResult};

/// Notes stored when a measurement is saved without any.
pub const DEFAULT_MEASUREMENT_NOTES: &str = "N/A";

/// Kind of JC Index measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MeasurementType {
    Baseline,
    #[serde(rename = "Follow-up")]
    FollowUp,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Baseline => "Baseline",
            MeasurementType::FollowUp => "Follow-up",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Ok(MeasurementType::Baseline),
            "follow-up" | "followup" | "follow up" => Ok(MeasurementType::FollowUp),
            _ => Err(ValidationError::UnknownMeasurementType(s.to_string())),
        }
    }
}

/// A single JC Index measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JcMeasurement {
    /// Store-assigned ID
    pub id: i64,
    /// Owning patient
    pub patient_id: String,
    /// Measurement date
    pub date: NaiveDate,
    /// JC Index value
    pub jc_index: f64,
    /// Baseline or follow-up
    #[serde(rename = "type")]
    pub kind: MeasurementType,
    /// Radiologist notes
    pub notes: String,
}

impl JcMeasurement {
    /// Build the stored record from a validated payload and an assigned ID.
    pub fn from_new(id: i64, patient_id: &str, new: &NewJcMeasurement) -> Self {
        Self {
            id,
            patient_id: patient_id.to_string(),
            date: new.date,
            jc_index: new.jc_index,
            kind: new.kind,
            notes: new.notes.clone(),
        }
    }

    /// Risk tier for this measurement's JC Index.
    pub fn risk_tier(&self) -> RiskTier {
        classify_risk(self.jc_index)
    }
}

/// A validated measurement payload, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJcMeasurement {
    date: NaiveDate,
    jc_index: f64,
    kind: MeasurementType,
    notes: String,
}

impl NewJcMeasurement {
    /// Validate a user-entered measurement. Empty notes become "N/A".
    pub fn new(
        date: NaiveDate,
        jc_index: f64,
        kind: MeasurementType,
        notes: impl Into<String>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            date,
            jc_index: validate_jc_index(jc_index)?,
            kind,
            notes: notes_or_default(notes.into(), DEFAULT_MEASUREMENT_NOTES),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn jc_index(&self) -> f64 {
        self.jc_index
    }

    pub fn kind(&self) -> MeasurementType {
        self.kind
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// Format a JC Index for display, always keeping one decimal for whole
/// values ("4.0", not "4").
pub fn format_jc_index(jc_index: f64) -> String {
    if jc_index.is_finite() && jc_index.fract() == 0.0 {
        format!("{:.1}", jc_index)
    } else {
        jc_index.to_string()
    }
}
