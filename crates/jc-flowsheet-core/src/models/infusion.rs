//! Infusion models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{notes_or_default, validate_infusion_number, validate_weight, ValidationResult};

/// Notes stored when an infusion is saved without any.
pub const DEFAULT_INFUSION_NOTES: &str = "No notes";

/// Milligrams of drug per kilogram of body weight.
pub const DOSE_MG_PER_KG: u64 = 10;

/// Drug concentration used to derive volume from dose.
pub const CONCENTRATION_MG_PER_ML: f64 = 100.0;

/// Infusion status. Every recorded infusion is completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InfusionStatus {
    #[default]
    Completed,
}

impl InfusionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfusionStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(InfusionStatus::Completed),
            _ => None,
        }
    }
}

/// A recorded drug administration event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Infusion {
    /// Infusion number, supplied by the user at entry time
    pub id: u32,
    /// Owning patient
    pub patient_id: String,
    /// Administration date
    pub date: NaiveDate,
    /// Patient weight in kg
    pub weight: u32,
    /// Derived dose, e.g. "910 mg"
    pub dose: String,
    /// Derived volume, e.g. "9.1 mL"
    pub volume: String,
    /// Always completed
    pub status: InfusionStatus,
    /// Free text notes
    pub notes: String,
}

impl Infusion {
    /// Build the stored record, deriving dose and volume from weight.
    pub fn from_new(patient_id: &str, new: &NewInfusion) -> Self {
        Self {
            id: new.id,
            patient_id: patient_id.to_string(),
            date: new.date,
            weight: new.weight,
            dose: dose_for_weight(new.weight),
            volume: volume_for_weight(new.weight),
            status: InfusionStatus::Completed,
            notes: new.notes.clone(),
        }
    }
}

/// Dose for a weight in kg, formatted as "{mg} mg".
pub fn dose_for_weight(weight_kg: u32) -> String {
    format!("{} mg", u64::from(weight_kg) * DOSE_MG_PER_KG)
}

/// Volume for a weight in kg, formatted with one decimal as "{mL} mL".
pub fn volume_for_weight(weight_kg: u32) -> String {
    let dose_mg = (u64::from(weight_kg) * DOSE_MG_PER_KG) as f64;
    format!("{:.1} mL", dose_mg / CONCENTRATION_MG_PER_ML)
}

/// A validated infusion payload, ready to be stored.
///
/// Only constructible through [`NewInfusion::new`], so the store never sees
/// a non-positive weight or infusion number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInfusion {
    id: u32,
    date: NaiveDate,
    weight: u32,
    notes: String,
}

impl NewInfusion {
    /// Validate a user-entered infusion. Empty notes become "No notes".
    pub fn new(
        id: i64,
        date: NaiveDate,
        weight_kg: i64,
        notes: impl Into<String>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id: validate_infusion_number(id)?,
            date,
            weight: validate_weight(weight_kg)?,
            notes: notes_or_default(notes.into(), DEFAULT_INFUSION_NOTES),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}
