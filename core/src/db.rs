use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::error::HydrationError;
use crate::models::{IntakeRecord, Settings, validate_amount};
use crate::units::Unit;

const DATE_FORMAT: &str = "%Y-%m-%d";
const SETTINGS_ID: i64 = 1;

/// The intake store. Holds one open SQLite connection for its lifetime; the
/// connection is released on drop or explicitly via [`Database::close`].
///
/// Every mutation is a single statement in autocommit mode, so each one is
/// committed atomically before the call returns. Concurrent writers from
/// several processes are not coordinated.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        let db = Database { conn };
        db.migrate()?;
        db.ensure_settings()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            info!(from = version, to = 1, "migrating schema");
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS water_intake (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL UNIQUE,
                    amount_ml REAL NOT NULL CHECK (amount_ml >= 0),
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    preferred_unit TEXT NOT NULL CHECK (preferred_unit IN ('ml', 'oz')),
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    /// Create the settings singleton with the default unit if it is missing.
    fn ensure_settings(&self) -> Result<()> {
        let now = Local::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO settings (id, preferred_unit, updated_at)
             VALUES (?1, ?2, ?3)",
            params![SETTINGS_ID, Unit::default().as_str(), now],
        )?;
        if inserted > 0 {
            info!(unit = %Unit::default(), "created default settings");
        }
        Ok(())
    }

    /// Release the connection, surfacing any error from closing it.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }

    // --- Row mapping helpers ---

    fn parse_date_column(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
        NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    fn parse_unit_column(idx: usize, s: &str) -> rusqlite::Result<Unit> {
        s.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    // Expects columns: 0: date, 1: amount_ml, 2: created_at, 3: updated_at
    fn intake_from_row(row: &rusqlite::Row) -> rusqlite::Result<IntakeRecord> {
        let date_str: String = row.get(0)?;
        Ok(IntakeRecord {
            date: Self::parse_date_column(0, &date_str)?,
            amount_ml: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    // --- Intake ---

    /// Add `amount_ml` to the total for `date`, creating the record on first log.
    pub fn log_intake(&self, date: NaiveDate, amount_ml: f64) -> Result<IntakeRecord> {
        let amount_ml = validate_amount(amount_ml)?;
        let existing = self.get_daily_intake(date)?;
        if !(existing + amount_ml).is_finite() {
            return Err(HydrationError::InvalidAmount(amount_ml).into());
        }
        let now = Local::now().to_rfc3339();
        let date_str = date.format(DATE_FORMAT).to_string();
        self.conn.execute(
            "INSERT INTO water_intake (date, amount_ml, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(date) DO UPDATE SET
                amount_ml = amount_ml + excluded.amount_ml,
                updated_at = excluded.updated_at",
            params![date_str, amount_ml, now],
        )?;
        debug!(date = %date_str, amount_ml, "logged intake");
        self.get_intake(date)?
            .context("Intake record not found after upsert")
    }

    pub fn get_intake(&self, date: NaiveDate) -> Result<Option<IntakeRecord>> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let mut stmt = self.conn.prepare(
            "SELECT date, amount_ml, created_at, updated_at
             FROM water_intake WHERE date = ?1",
        )?;
        let mut rows = stmt.query(params![date_str])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::intake_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Total logged for `date` in ml, `0.0` when nothing was logged.
    pub fn get_daily_intake(&self, date: NaiveDate) -> Result<f64> {
        Ok(self.get_intake(date)?.map_or(0.0, |r| r.amount_ml))
    }

    /// Records with `start <= date <= end`. Order is unspecified; a reversed
    /// range yields no records.
    pub fn get_weekly_intake(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<IntakeRecord>> {
        if start > end {
            debug!(%start, %end, "reversed intake range, returning no records");
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT date, amount_ml, created_at, updated_at
             FROM water_intake WHERE date >= ?1 AND date <= ?2",
        )?;
        let records = stmt
            .query_map(
                params![
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string()
                ],
                Self::intake_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%start, %end, count = records.len(), "queried intake range");
        Ok(records)
    }

    // --- Settings ---

    pub fn set_preferred_unit(&self, unit: Unit) -> Result<()> {
        let now = Local::now().to_rfc3339();
        let rows = self.conn.execute(
            "UPDATE settings SET preferred_unit = ?1, updated_at = ?2 WHERE id = ?3",
            params![unit.as_str(), now, SETTINGS_ID],
        )?;
        if rows == 0 {
            anyhow::bail!("Settings row is missing");
        }
        debug!(%unit, "set preferred unit");
        Ok(())
    }

    pub fn get_settings(&self) -> Result<Settings> {
        self.conn
            .query_row(
                "SELECT preferred_unit, updated_at FROM settings WHERE id = ?1",
                params![SETTINGS_ID],
                |row| {
                    let unit: String = row.get(0)?;
                    Ok(Settings {
                        preferred_unit: Self::parse_unit_column(0, &unit)?,
                        updated_at: row.get(1)?,
                    })
                },
            )
            .context("Failed to read settings")
    }

    pub fn get_preferred_unit(&self) -> Result<Unit> {
        Ok(self.get_settings()?.preferred_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn settings_count(db: &Database) -> i64 {
        db.conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_log_creates_record() {
        let db = Database::open_in_memory().unwrap();
        let record = db.log_intake(day(1), 500.0).unwrap();
        assert_eq!(record.date, day(1));
        assert!((record.amount_ml - 500.0).abs() < f64::EPSILON);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_log_accumulates_same_date() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(1), 500.0).unwrap();
        let record = db.log_intake(day(1), 250.0).unwrap();
        assert!((record.amount_ml - 750.0).abs() < f64::EPSILON);
        assert!((db.get_daily_intake(day(1)).unwrap() - 750.0).abs() < f64::EPSILON);

        let rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM water_intake", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_daily_intake_absent_date() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(2), 100.0).unwrap();
        assert!(db.get_daily_intake(day(1)).unwrap().abs() < f64::EPSILON);
        assert!(db.get_intake(day(1)).unwrap().is_none());
    }

    #[test]
    fn test_log_rejects_negative_amount() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(1), 300.0).unwrap();

        let err = db.log_intake(day(1), -50.0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<HydrationError>(),
            Some(&HydrationError::InvalidAmount(-50.0))
        );
        assert!(db.log_intake(day(1), f64::NAN).is_err());
        assert!((db.get_daily_intake(day(1)).unwrap() - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_log_rejects_total_overflow() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(1), f64::MAX).unwrap();

        let err = db.log_intake(day(1), f64::MAX).unwrap_err();
        assert_eq!(
            err.downcast_ref::<HydrationError>(),
            Some(&HydrationError::InvalidAmount(f64::MAX))
        );
        let total = db.get_daily_intake(day(1)).unwrap();
        assert!(total.is_finite());
        assert!((total - f64::MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_log_zero_amount() {
        let db = Database::open_in_memory().unwrap();
        let record = db.log_intake(day(1), 0.0).unwrap();
        assert!(record.amount_ml.abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_intake_inclusive_range() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(1), 1000.0).unwrap(); // outside the window
        db.log_intake(day(2), 100.0).unwrap();
        db.log_intake(day(7), 250.0).unwrap();
        db.log_intake(day(8), 500.0).unwrap();
        db.log_intake(day(9), 2000.0).unwrap(); // outside the window

        let records = db.get_weekly_intake(day(2), day(8)).unwrap();
        assert_eq!(records.len(), 3);
        let total: f64 = records.iter().map(|r| r.amount_ml).sum();
        assert!((total - 850.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_intake_across_month_boundary() {
        let db = Database::open_in_memory().unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let start = end - chrono::Duration::days(6);
        db.log_intake(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 250.0)
            .unwrap();
        db.log_intake(end, 500.0).unwrap();

        let total: f64 = db
            .get_weekly_intake(start, end)
            .unwrap()
            .iter()
            .map(|r| r.amount_ml)
            .sum();
        assert!((total - 750.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_intake_reversed_range_is_empty() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(3), 100.0).unwrap();
        assert!(db.get_weekly_intake(day(7), day(1)).unwrap().is_empty());
    }

    #[test]
    fn test_weekly_intake_single_day_range() {
        let db = Database::open_in_memory().unwrap();
        db.log_intake(day(3), 100.0).unwrap();
        let records = db.get_weekly_intake(day(3), day(3)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, day(3));
    }

    #[test]
    fn test_preferred_unit_defaults_to_ml() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_preferred_unit().unwrap(), Unit::Ml);
        assert_eq!(settings_count(&db), 1);
    }

    #[test]
    fn test_set_and_get_preferred_unit() {
        let db = Database::open_in_memory().unwrap();
        db.set_preferred_unit(Unit::Oz).unwrap();
        assert_eq!(db.get_preferred_unit().unwrap(), Unit::Oz);
        db.set_preferred_unit(Unit::Ml).unwrap();
        assert_eq!(db.get_preferred_unit().unwrap(), Unit::Ml);
        assert_eq!(settings_count(&db), 1);
    }

    #[test]
    fn test_settings_row_is_singleton_in_schema() {
        let db = Database::open_in_memory().unwrap();
        let result = db.conn.execute(
            "INSERT INTO settings (id, preferred_unit, updated_at) VALUES (2, 'oz', 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydration.db");

        let db = Database::open(&path).unwrap();
        db.log_intake(day(1), 400.0).unwrap();
        db.set_preferred_unit(Unit::Oz).unwrap();
        db.close().unwrap();

        let db = Database::open(&path).unwrap();
        drop(db);
        let db = Database::open(&path).unwrap();
        assert_eq!(settings_count(&db), 1);
        assert_eq!(db.get_preferred_unit().unwrap(), Unit::Oz);
        assert!((db.get_daily_intake(day(1)).unwrap() - 400.0).abs() < f64::EPSILON);

        let version: i64 = db
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_writes_visible_to_second_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydration.db");

        let writer = Database::open(&path).unwrap();
        let reader = Database::open(&path).unwrap();
        writer.log_intake(day(4), 330.0).unwrap();
        assert!((reader.get_daily_intake(day(4)).unwrap() - 330.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_open_bad_path_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("hydration.db");
        let err = Database::open(&path).err().unwrap();
        assert!(format!("{err:#}").contains("Failed to open database"));
    }
}
