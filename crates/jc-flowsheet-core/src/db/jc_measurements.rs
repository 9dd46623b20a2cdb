//! JC measurement database operations.

use rusqlite::{params, Row};

use super::{date_from_sql, date_to_sql, Database, DbResult};
use crate::models::{JcMeasurement, MeasurementType, NewJcMeasurement};

impl Database {
    /// Insert a measurement and return it with its assigned ID.
    pub fn insert_jc_measurement(
        &self,
        patient_id: &str,
        measurement: &NewJcMeasurement,
    ) -> DbResult<JcMeasurement> {
        self.conn.execute(
            r#"
            INSERT INTO jc_measurements (
                patient_id, date, jc_index, measurement_type, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                patient_id,
                date_to_sql(measurement.date()),
                measurement.jc_index(),
                measurement.kind().as_str(),
                measurement.notes(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(JcMeasurement::from_new(id, patient_id, measurement))
    }

    /// List a patient's measurements, most recent date first.
    ///
    /// Measurements sharing a date are ordered newest insertion first.
    pub fn list_jc_measurements(&self, patient_id: &str) -> DbResult<Vec<JcMeasurement>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, date, jc_index, measurement_type, notes
            FROM jc_measurements
            WHERE patient_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], row_to_measurement)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count a patient's measurements.
    pub fn count_jc_measurements(&self, patient_id: &str) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM jc_measurements WHERE patient_id = ?",
            [patient_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn row_to_measurement(row: &Row) -> rusqlite::Result<JcMeasurement> {
    let date: String = row.get(2)?;
    let kind: String = row.get(4)?;

    Ok(JcMeasurement {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        date: date_from_sql(2, &date)?,
        jc_index: row.get(3)?,
        kind: kind.parse::<MeasurementType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        notes: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn measurement(date: &str, jc_index: f64, kind: MeasurementType, notes: &str) -> NewJcMeasurement {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        NewJcMeasurement::new(date, jc_index, kind, notes).unwrap()
    }

    #[test]
    fn test_insert_assigns_ids() {
        let db = setup_db();

        let first = db
            .insert_jc_measurement("P1", &measurement("2025-05-12", 3.4, MeasurementType::FollowUp, "4r"))
            .unwrap();
        let second = db
            .insert_jc_measurement("P1", &measurement("2025-06-05", 3.2, MeasurementType::Baseline, ""))
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(second.notes, "N/A");
    }

    #[test]
    fn test_round_trip() {
        let db = setup_db();

        let stored = db
            .insert_jc_measurement("P1", &measurement("2025-08-27", 4.5, MeasurementType::Baseline, "mri"))
            .unwrap();

        let listed = db.list_jc_measurements("P1").unwrap();
        assert_eq!(listed, vec![stored]);
        assert_eq!(listed[0].kind, MeasurementType::Baseline);
        assert_eq!(listed[0].notes, "mri");
    }

    #[test]
    fn test_list_sorted_descending() {
        let db = setup_db();

        for (date, value) in [("2025-06-05", 3.2), ("2025-08-27", 4.5), ("2025-07-15", 3.6)] {
            db.insert_jc_measurement("P1", &measurement(date, value, MeasurementType::Baseline, ""))
                .unwrap();
        }

        let values: Vec<f64> = db
            .list_jc_measurements("P1")
            .unwrap()
            .iter()
            .map(|m| m.jc_index)
            .collect();
        assert_eq!(values, vec![4.5, 3.6, 3.2]);
    }

    #[test]
    fn test_count_and_scope() {
        let db = setup_db();

        db.insert_jc_measurement("P1", &measurement("2025-06-05", 3.2, MeasurementType::Baseline, ""))
            .unwrap();

        assert_eq!(db.count_jc_measurements("P1").unwrap(), 1);
        assert_eq!(db.count_jc_measurements("P2").unwrap(), 0);
        assert!(db.list_jc_measurements("P2").unwrap().is_empty());
    }
}
