//! Boundary validation for user-supplied input.

use chrono::NaiveDate;
use thiserror::Error;

/// Input rejected before it reaches the record store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Patient ID must not be empty")]
    EmptyPatientId,

    #[error("Infusion number must be a positive integer, got {0}")]
    InvalidInfusionNumber(i64),

    #[error("Weight must be between 1 and {max} kg, got {value}", max = MAX_WEIGHT_KG)]
    InvalidWeight { value: i64 },

    #[error("JC Index must be between {min:.1} and {max:.1}, got {value}", min = JC_INDEX_MIN, max = JC_INDEX_MAX)]
    JcIndexOutOfRange { value: f64 },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown measurement type: {0}")]
    UnknownMeasurementType(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Smallest accepted JC Index.
pub const JC_INDEX_MIN: f64 = 0.0;

/// Largest accepted JC Index.
pub const JC_INDEX_MAX: f64 = 10.0;

/// Upper bound on patient weight; keeps derived dose arithmetic in range.
pub const MAX_WEIGHT_KG: i64 = 1000;

/// Trim and check a patient identifier.
pub fn validate_patient_id(patient_id: &str) -> ValidationResult<String> {
    let trimmed = patient_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPatientId);
    }
    Ok(trimmed.to_string())
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

pub(crate) fn validate_infusion_number(id: i64) -> ValidationResult<u32> {
    match u32::try_from(id) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidInfusionNumber(id)),
    }
}

pub(crate) fn validate_weight(weight_kg: i64) -> ValidationResult<u32> {
    if weight_kg <= 0 || weight_kg > MAX_WEIGHT_KG {
        return Err(ValidationError::InvalidWeight { value: weight_kg });
    }
    // Bounded above, so the conversion cannot fail.
    Ok(weight_kg as u32)
}

pub(crate) fn validate_jc_index(jc_index: f64) -> ValidationResult<f64> {
    if !jc_index.is_finite() || !(JC_INDEX_MIN..=JC_INDEX_MAX).contains(&jc_index) {
        return Err(ValidationError::JcIndexOutOfRange { value: jc_index });
    }
    Ok(jc_index)
}

/// Replace empty (or whitespace-only) notes with a default.
pub(crate) fn notes_or_default(notes: String, default: &str) -> String {
    if notes.trim().is_empty() {
        default.to_string()
    } else {
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_trimmed() {
        assert_eq!(validate_patient_id("  Patient 001 ").unwrap(), "Patient 001");
        assert_eq!(validate_patient_id("   "), Err(ValidationError::EmptyPatientId));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
        assert!(matches!(parse_date("09/01/2025"), Err(ValidationError::InvalidDate(_))));
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_infusion_number() {
        assert_eq!(validate_infusion_number(22).unwrap(), 22);
        assert!(validate_infusion_number(0).is_err());
        assert!(validate_infusion_number(-3).is_err());
        assert!(validate_infusion_number(i64::MAX).is_err());
    }

    #[test]
    fn test_weight() {
        assert_eq!(validate_weight(91).unwrap(), 91);
        assert_eq!(
            validate_weight(0),
            Err(ValidationError::InvalidWeight { value: 0 })
        );
        assert!(validate_weight(-5).is_err());
        assert!(validate_weight(MAX_WEIGHT_KG + 1).is_err());
    }

    #[test]
    fn test_jc_index_range_inclusive() {
        assert_eq!(validate_jc_index(0.0).unwrap(), 0.0);
        assert_eq!(validate_jc_index(10.0).unwrap(), 10.0);
        assert!(validate_jc_index(10.1).is_err());
        assert!(validate_jc_index(-0.1).is_err());
        assert!(validate_jc_index(f64::NAN).is_err());
        assert!(validate_jc_index(f64::INFINITY).is_err());
    }

    #[test]
    fn test_notes_default() {
        assert_eq!(notes_or_default(String::new(), "N/A"), "N/A");
        assert_eq!(notes_or_default("  ".into(), "N/A"), "N/A");
        assert_eq!(notes_or_default("mri".into(), "N/A"), "mri");
    }

    #[test]
    fn test_error_messages() {
        let err = ValidationError::JcIndexOutOfRange { value: 12.0 };
        assert_eq!(err.to_string(), "JC Index must be between 0.0 and 10.0, got 12");
        let err = ValidationError::InvalidWeight { value: 0 };
        assert_eq!(err.to_string(), "Weight must be between 1 and 1000 kg, got 0");
    }
}
