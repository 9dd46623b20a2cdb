//! SQLite schema definition.

/// Complete database schema for the flowsheet.
///
/// Every statement is `IF NOT EXISTS`, so applying it to an existing
/// database is a no-op.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Infusions
-- ============================================================================

CREATE TABLE IF NOT EXISTS infusions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,        -- insertion order, tie-breaker
    patient_id TEXT NOT NULL,
    infusion_number INTEGER NOT NULL CHECK (infusion_number > 0),
    date TEXT NOT NULL,                           -- YYYY-MM-DD
    weight_kg INTEGER NOT NULL CHECK (weight_kg > 0),
    dose TEXT NOT NULL,
    volume TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'completed' CHECK (status IN ('completed')),
    notes TEXT NOT NULL DEFAULT 'No notes',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (patient_id, infusion_number)
);

CREATE INDEX IF NOT EXISTS idx_infusions_patient_date ON infusions(patient_id, date);

-- ============================================================================
-- JC Index Measurements
-- ============================================================================

-- jc_index range is enforced at the input boundary, not here
CREATE TABLE IF NOT EXISTS jc_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL,
    date TEXT NOT NULL,                           -- YYYY-MM-DD
    jc_index REAL NOT NULL,
    measurement_type TEXT NOT NULL CHECK (measurement_type IN ('Baseline', 'Follow-up')),
    notes TEXT NOT NULL DEFAULT 'N/A',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_jc_measurements_patient_date ON jc_measurements(patient_id, date);
"#;
