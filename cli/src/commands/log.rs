use anyhow::Result;

use hydrate_core::Unit;
use hydrate_core::service::HydrationService;

use super::CliError;
use super::helpers::{format_amount, parse_date};

const MISSING_AMOUNT_OR_UNIT: &str = "Please provide both amount and unit (ml or oz).";

pub(crate) fn cmd_log(
    svc: &HydrationService,
    amount: Option<f64>,
    unit: Option<Unit>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let (Some(amount), Some(unit)) = (amount, unit) else {
        return Err(CliError::MissingArgument(MISSING_AMOUNT_OR_UNIT).into());
    };

    let date = parse_date(date)?;
    let record = svc.log_in(date, amount, unit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Logged {} {unit} of water.", format_amount(amount));
    }

    Ok(())
}
