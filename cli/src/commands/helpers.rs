use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use hydrate_core::models::{DailySummary, Volume, WeeklySummary};

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(today()),
        Some(s) => match s.as_str() {
            "today" => Ok(today()),
            "yesterday" => Ok(today() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")),
        },
    }
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

/// Render a user-entered amount the way it was typed as a float: whole
/// numbers keep a trailing `.0` (`500.0`), fractions print as-is (`16.9`).
pub(crate) fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{amount:.1}")
    } else {
        format!("{amount}")
    }
}

pub(crate) fn format_volume(v: &Volume) -> String {
    format!("{:.2} {}", no_neg_zero(v.amount), v.unit)
}

pub(crate) fn daily_line(summary: &DailySummary, today: NaiveDate) -> String {
    let total = format_volume(&summary.total);
    if summary.date == today {
        format!("Total water intake for today: {total}")
    } else {
        format!(
            "Total water intake for {}: {total}",
            summary.date.format("%Y-%m-%d")
        )
    }
}

pub(crate) fn weekly_line(summary: &WeeklySummary) -> String {
    format!(
        "Total water intake for the past week: {}",
        format_volume(&summary.total)
    )
}

pub(crate) fn weekly_table(summary: &WeeklySummary) -> String {
    #[derive(Tabled)]
    struct DayRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Day")]
        weekday: String,
        #[tabled(rename = "Intake")]
        intake: String,
    }

    let unit = summary.total.unit;
    let rows: Vec<DayRow> = summary
        .daily_totals()
        .into_iter()
        .map(|(date, ml)| DayRow {
            date: date.format("%Y-%m-%d").to_string(),
            weekday: date.format("%a").to_string(),
            intake: format_volume(&unit.from_milliliters(ml)),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string()
}
