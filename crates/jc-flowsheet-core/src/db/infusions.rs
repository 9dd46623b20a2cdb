//! Infusion database operations.

use rusqlite::{params, Row};

use super::{date_from_sql, date_to_sql, is_unique_violation, Database, DbError, DbResult};
use crate::models::{Infusion, InfusionStatus};

impl Database {
    /// Insert a new infusion.
    ///
    /// Fails with [`DbError::Constraint`] if the patient already has an
    /// infusion with the same number.
    pub fn insert_infusion(&self, infusion: &Infusion) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO infusions (
                    patient_id, infusion_number, date, weight_kg,
                    dose, volume, status, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    infusion.patient_id,
                    infusion.id,
                    date_to_sql(infusion.date),
                    infusion.weight,
                    infusion.dose,
                    infusion.volume,
                    infusion.status.as_str(),
                    infusion.notes,
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::Constraint(format!(
                        "infusion #{} already exists for patient {}",
                        infusion.id, infusion.patient_id
                    ))
                } else {
                    DbError::Sqlite(e)
                }
            })?;
        Ok(())
    }

    /// List a patient's infusions, most recent date first.
    ///
    /// Infusions sharing a date are ordered newest insertion first.
    pub fn list_infusions(&self, patient_id: &str) -> DbResult<Vec<Infusion>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT infusion_number, patient_id, date, weight_kg,
                   dose, volume, status, notes
            FROM infusions
            WHERE patient_id = ?
            ORDER BY date DESC, seq DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], row_to_infusion)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count a patient's infusions.
    pub fn count_infusions(&self, patient_id: &str) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM infusions WHERE patient_id = ?",
            [patient_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Highest infusion number recorded for a patient.
    pub fn max_infusion_number(&self, patient_id: &str) -> DbResult<Option<u32>> {
        self.conn
            .query_row(
                "SELECT MAX(infusion_number) FROM infusions WHERE patient_id = ?",
                [patient_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

fn row_to_infusion(row: &Row) -> rusqlite::Result<Infusion> {
    let date: String = row.get(2)?;
    let status: String = row.get(6)?;

    Ok(Infusion {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        date: date_from_sql(2, &date)?,
        weight: row.get(3)?,
        dose: row.get(4)?,
        volume: row.get(5)?,
        status: InfusionStatus::parse(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown infusion status: {}", status).into(),
            )
        })?,
        notes: row.get(7)?,
    })
}
