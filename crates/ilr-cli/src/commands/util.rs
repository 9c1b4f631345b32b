//! Shared utilities for CLI commands.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use ilr_data::DATE_FORMAT;

/// Parse a date argument in DD-MM-YYYY form.
pub fn parse_day(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("invalid date: {s}. Use DD-MM-YYYY (e.g., 29-03-2023)"))
}

/// Parse a month argument in MM-YYYY form into (year, month).
pub fn parse_month(s: &str) -> anyhow::Result<(i32, u32)> {
    let Some((month_part, year_part)) = s.split_once('-') else {
        anyhow::bail!("invalid month: {s}. Use MM-YYYY (e.g., 06-2024)");
    };

    let month: u32 = month_part
        .parse()
        .with_context(|| format!("invalid month: {s}. Use MM-YYYY (e.g., 06-2024)"))?;
    let year: i32 = year_part
        .parse()
        .with_context(|| format!("invalid month: {s}. Use MM-YYYY (e.g., 06-2024)"))?;

    if !(1..=12).contains(&month) {
        anyhow::bail!("invalid month: {month} is not in 1..=12");
    }

    Ok((year, month))
}

/// Resolve an optional `--as-of` argument, defaulting to today.
pub fn resolve_as_of(arg: Option<&str>) -> anyhow::Result<NaiveDate> {
    match arg {
        Some(s) => parse_day(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Formats a date in the CLI's DD-MM-YYYY form.
pub fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Plural suffix for counts other than one.
pub const fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Generates a 10-character progress bar.
/// Values under 5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
