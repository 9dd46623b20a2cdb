//! CSV export of record lists.
//!
//! Header row holds the field names in struct order; rows keep the order of
//! the input slice.

use crate::models::{format_jc_index, Infusion, JcMeasurement};

/// Infusion CSV header.
pub const INFUSION_CSV_HEADER: &str = "id,patient_id,date,weight,dose,volume,status,notes";

/// JC measurement CSV header.
pub const JC_MEASUREMENT_CSV_HEADER: &str = "id,patient_id,date,jc_index,type,notes";

/// Export infusions to CSV.
pub fn infusions_to_csv(infusions: &[Infusion]) -> String {
    let mut csv = String::new();

    csv.push_str(INFUSION_CSV_HEADER);
    csv.push('\n');

    for infusion in infusions {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            infusion.id,
            escape_csv(&infusion.patient_id),
            infusion.date,
            infusion.weight,
            escape_csv(&infusion.dose),
            escape_csv(&infusion.volume),
            infusion.status.as_str(),
            escape_csv(&infusion.notes),
        ));
    }

    csv
}

/// Export JC measurements to CSV.
pub fn jc_measurements_to_csv(measurements: &[JcMeasurement]) -> String {
    let mut csv = String::new();

    csv.push_str(JC_MEASUREMENT_CSV_HEADER);
    csv.push('\n');

    for m in measurements {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            m.id,
            escape_csv(&m.patient_id),
            m.date,
            format_jc_index(m.jc_index),
            m.kind.as_str(),
            escape_csv(&m.notes),
        ));
    }

    csv
}

/// Download file name for a patient's infusion CSV.
pub fn infusions_file_name(patient_id: &str) -> String {
    format!("infusions_{}.csv", patient_id)
}

/// Download file name for a patient's JC Index CSV.
pub fn jc_measurements_file_name(patient_id: &str) -> String {
    format!("jc_index_{}.csv", patient_id)
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
