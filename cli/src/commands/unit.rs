use anyhow::Result;

use hydrate_core::Unit;
use hydrate_core::service::HydrationService;

use super::CliError;

const MISSING_UNIT: &str = "Please provide a unit (ml or oz).";

pub(crate) fn cmd_unit(svc: &HydrationService, unit: Option<Unit>, json: bool) -> Result<()> {
    let Some(unit) = unit else {
        return Err(CliError::MissingArgument(MISSING_UNIT).into());
    };

    svc.set_preferred_unit_to(unit)?;

    if json {
        println!("{}", serde_json::json!({ "preferred_unit": unit }));
    } else {
        println!("Preferred unit set to {unit}.");
    }

    Ok(())
}
