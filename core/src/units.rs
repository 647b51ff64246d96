use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HydrationError;
use crate::models::Volume;

/// Milliliters per US fluid ounce.
pub const ML_PER_OZ: f64 = 29.5735;

/// Volume units a user can log in or display with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Ml,
    Oz,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Ml, Unit::Oz];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Ml => "ml",
            Unit::Oz => "oz",
        }
    }

    #[must_use]
    pub fn to_milliliters(self, amount: f64) -> f64 {
        match self {
            Unit::Ml => amount,
            Unit::Oz => amount * ML_PER_OZ,
        }
    }

    #[must_use]
    pub fn from_milliliters(self, amount_ml: f64) -> Volume {
        let amount = match self {
            Unit::Ml => amount_ml,
            Unit::Oz => amount_ml / ML_PER_OZ,
        };
        Volume { amount, unit: self }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = HydrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(Unit::Ml),
            "oz" => Ok(Unit::Oz),
            _ => Err(HydrationError::InvalidUnit(s.to_string())),
        }
    }
}

/// Convert `amount` expressed in `unit` to milliliters.
pub fn to_milliliters(amount: f64, unit: &str) -> Result<f64, HydrationError> {
    Ok(unit.parse::<Unit>()?.to_milliliters(amount))
}

/// Convert a milliliter amount into `unit`, returning the amount with its unit.
pub fn from_milliliters(amount_ml: f64, unit: &str) -> Result<Volume, HydrationError> {
    Ok(unit.parse::<Unit>()?.from_milliliters(amount_ml))
}
