//! Database layer for the flowsheet.

mod schema;
mod infusions;
mod jc_measurements;

pub use schema::*;

use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Storage format for calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let db = Self::connect(path)?;
        db.initialize()?;
        Ok(db)
    }

    /// Open a connection without touching the schema.
    pub fn connect<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Ensure the schema exists. Safe to call repeatedly.
    pub fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside an immediate transaction.
    ///
    /// Commits if `f` succeeds; any error rolls back everything `f` wrote.
    pub fn in_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let value = f(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}

fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_from_sql(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"infusions".to_string()));
        assert!(tables.contains(&"jc_measurements".to_string()));
    }

    #[test]
    fn test_initialize_twice() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.initialize().is_ok());
    }

    #[test]
    fn test_reopen_file_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowsheet.db");

        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM infusions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_connect_leaves_schema_alone() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(dir.path().join("flowsheet.db")).unwrap();

        let tables: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type='table'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: DbResult<()> = db.in_transaction(|db| {
            db.conn().execute(
                "INSERT INTO jc_measurements (patient_id, date, jc_index, measurement_type, notes)
                 VALUES ('P1', '2025-08-27', 4.5, 'Baseline', 'mri')",
                [],
            )?;
            Err(DbError::Constraint("abort".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM jc_measurements", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_only_unique_failures_count_as_duplicates() {
        let db = Database::open_in_memory().unwrap();
        let insert = "INSERT INTO infusions (patient_id, infusion_number, date, weight_kg, dose, volume, status, notes)
                      VALUES ('P1', 1, '2025-05-12', ?1, '910 mg', '9.1 mL', 'completed', 'No notes')";

        db.conn().execute(insert, [91]).unwrap();
        let duplicate = db.conn().execute(insert, [91]).unwrap_err();
        assert!(is_unique_violation(&duplicate));

        // CHECK (weight_kg > 0) is a constraint failure but not a duplicate
        db.conn().execute("DELETE FROM infusions", []).unwrap();
        let check = db.conn().execute(insert, [0]).unwrap_err();
        assert!(!is_unique_violation(&check));
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 27).unwrap();
        assert_eq!(date_to_sql(date), "2025-08-27");
        assert_eq!(date_from_sql(0, "2025-08-27").unwrap(), date);
        assert!(date_from_sql(0, "27/08/2025").is_err());
    }
}
