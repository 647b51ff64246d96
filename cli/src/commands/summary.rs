use anyhow::Result;

use hydrate_core::service::HydrationService;

use super::helpers::{daily_line, parse_date, today, weekly_line, weekly_table};

pub(crate) fn cmd_daily(svc: &HydrationService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let summary = svc.daily_summary(date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", daily_line(&summary, today()));
    }

    Ok(())
}

pub(crate) fn cmd_weekly(svc: &HydrationService, breakdown: bool, json: bool) -> Result<()> {
    let summary = svc.weekly_summary(today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if breakdown {
        println!("{}", weekly_table(&summary));
    }
    println!("{}", weekly_line(&summary));

    Ok(())
}
