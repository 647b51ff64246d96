use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HydrationError;
use crate::units::Unit;

/// Total water logged for one calendar date, always in milliliters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub date: NaiveDate,
    pub amount_ml: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// The singleton settings row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub preferred_unit: Unit,
    pub updated_at: String,
}

/// An amount paired with the unit it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub amount: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_ml: f64,
    pub total: Volume,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Days with at least one log, sorted by date.
    pub days: Vec<IntakeRecord>,
    pub total_ml: f64,
    pub total: Volume,
}

impl WeeklySummary {
    /// Every date in the window with its total in ml, zero-filled for days without logs.
    #[must_use]
    pub fn daily_totals(&self) -> Vec<(NaiveDate, f64)> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .map(|d| {
                let ml = self
                    .days
                    .iter()
                    .find(|r| r.date == d)
                    .map_or(0.0, |r| r.amount_ml);
                (d, ml)
            })
            .collect()
    }
}

/// Reject negative and non-finite amounts before they reach storage.
pub fn validate_amount(amount_ml: f64) -> Result<f64, HydrationError> {
    if !amount_ml.is_finite() || amount_ml < 0.0 {
        return Err(HydrationError::InvalidAmount(amount_ml));
    }
    Ok(amount_ml)
}
