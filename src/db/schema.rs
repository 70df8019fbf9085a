//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `clinics` table (one managed clinic per row, `username` unique)
/// - `patients` table (written by the clinic apps; only `created_at` is read here)
/// - `appointments` table (written by the clinic apps; only `date` is read here)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Clinics
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS clinics (
    id TEXT PRIMARY KEY NOT NULL, -- UUID v4
    name TEXT NOT NULL,
    identifier TEXT NOT NULL,
    location TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    image_url TEXT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL, -- argon2 PHC string
    created_at TEXT NOT NULL -- RFC3339
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_clinics_username ON clinics(username);

-- ---------------------------------------------------------------------------
-- Patients
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY NOT NULL,
    created_at TEXT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Appointments
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY NOT NULL,
    date TEXT NULL -- YYYY-MM-DD
);

CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date);
"#;
