//! Bootstrap records inserted for a patient with no history.

use chrono::NaiveDate;

use crate::models::{MeasurementType, NewInfusion, NewJcMeasurement};

/// (infusion number, (year, month, day), weight kg, notes), newest first.
const BOOTSTRAP_INFUSIONS: [(i64, (i32, u32, u32), i64, &str); 4] = [
    (21, (2025, 8, 27), 91, "infusion"),
    (20, (2025, 8, 13), 91, "No notes"),
    (19, (2025, 7, 28), 91, "No notes"),
    (18, (2025, 5, 12), 91, "No notes"),
];

/// ((year, month, day), JC Index, type, notes), newest first.
const BOOTSTRAP_JC_MEASUREMENTS: [((i32, u32, u32), f64, MeasurementType, &str); 6] = [
    ((2025, 8, 27), 4.5, MeasurementType::Baseline, "mri"),
    ((2025, 8, 13), 4.1, MeasurementType::Baseline, "N/A"),
    ((2025, 7, 30), 3.8, MeasurementType::Baseline, "weew"),
    ((2025, 7, 15), 3.6, MeasurementType::Baseline, "1"),
    ((2025, 6, 5), 3.2, MeasurementType::Baseline, "44"),
    ((2025, 5, 12), 3.4, MeasurementType::FollowUp, "4r"),
];

/// Bootstrap infusions in insertion order (oldest first).
pub fn bootstrap_infusions() -> Vec<NewInfusion> {
    BOOTSTRAP_INFUSIONS
        .iter()
        .rev()
        .filter_map(|&(id, (y, m, d), weight, notes)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            NewInfusion::new(id, date, weight, notes).ok()
        })
        .collect()
}

/// Bootstrap JC measurements in insertion order (oldest first).
pub fn bootstrap_jc_measurements() -> Vec<NewJcMeasurement> {
    BOOTSTRAP_JC_MEASUREMENTS
        .iter()
        .rev()
        .filter_map(|&((y, m, d), jc_index, kind, notes)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            NewJcMeasurement::new(date, jc_index, kind, notes).ok()
        })
        .collect()
}
