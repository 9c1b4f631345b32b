//! Visas command listing recorded visa periods.

use std::io::Write;

use anyhow::Result;
use ilr_core::{DayClass, Timeline};

use super::util;

/// Runs the visas command.
///
/// The "in UK" column counts the residence days classified under each
/// period, so a period interrupted by trips or preceding entry shows
/// fewer days than its calendar duration.
pub fn run<W: Write>(writer: &mut W, timeline: &Timeline, json: bool) -> Result<()> {
    let periods = timeline.visas().periods();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(periods)?)?;
        return Ok(());
    }

    if periods.is_empty() {
        writeln!(writer, "No visa periods recorded.")?;
        return Ok(());
    }

    writeln!(writer, "VISA PERIODS")?;
    writeln!(writer, "────────────")?;
    for period in periods {
        let residence_days = timeline
            .days()
            .iter()
            .filter(|day| {
                day.visa_id.as_ref() == Some(&period.id) && day.class == DayClass::UkResidence
            })
            .count();
        writeln!(
            writer,
            "{:<16} {} to {}  {:>4} days  {:>4} in UK  {}",
            period.id,
            util::fmt_date(period.start_date),
            util::fmt_date(period.end_date),
            period.duration_days(),
            residence_days,
            period.label
        )?;
    }

    Ok(())
}
