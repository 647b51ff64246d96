use std::path::Path;

use anyhow::Result;
use chrono::{Duration, NaiveDate};

use crate::db::Database;
use crate::models::{DailySummary, IntakeRecord, WeeklySummary};
use crate::units::Unit;

/// Number of days in the weekly window, ending on (and including) the given day.
pub const WEEK_DAYS: i64 = 7;

/// Front door for callers that deal in user-entered units rather than milliliters.
pub struct HydrationService {
    db: Database,
}

impl HydrationService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn close(self) -> Result<()> {
        self.db.close()
    }

    /// Log `amount` given in `unit` (`"ml"` or `"oz"`) against `date`.
    pub fn log(&self, date: NaiveDate, amount: f64, unit: &str) -> Result<IntakeRecord> {
        let unit: Unit = unit.parse()?;
        self.log_in(date, amount, unit)
    }

    pub fn log_in(&self, date: NaiveDate, amount: f64, unit: Unit) -> Result<IntakeRecord> {
        self.db.log_intake(date, unit.to_milliliters(amount))
    }

    pub fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        let total_ml = self.db.get_daily_intake(date)?;
        let unit = self.db.get_preferred_unit()?;
        Ok(DailySummary {
            date,
            total_ml,
            total: unit.from_milliliters(total_ml),
        })
    }

    /// Summary of the `WEEK_DAYS` days ending on `end`.
    pub fn weekly_summary(&self, end: NaiveDate) -> Result<WeeklySummary> {
        let start = end - Duration::days(WEEK_DAYS - 1);
        let mut days = self.db.get_weekly_intake(start, end)?;
        days.sort_by_key(|r| r.date);

        let total_ml: f64 = days.iter().map(|r| r.amount_ml).sum();
        let unit = self.db.get_preferred_unit()?;
        Ok(WeeklySummary {
            start,
            end,
            days,
            total_ml,
            total: unit.from_milliliters(total_ml),
        })
    }

    pub fn set_preferred_unit(&self, unit: &str) -> Result<Unit> {
        let unit: Unit = unit.parse()?;
        self.set_preferred_unit_to(unit)?;
        Ok(unit)
    }

    pub fn set_preferred_unit_to(&self, unit: Unit) -> Result<()> {
        self.db.set_preferred_unit(unit)
    }

    pub fn preferred_unit(&self) -> Result<Unit> {
        self.db.get_preferred_unit()
    }
}
