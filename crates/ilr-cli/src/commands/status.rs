//! Status command showing progress toward the residence target.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use ilr_core::{ClassCounts, NoVisaPolicy, Projection, StatsEngine, Timeline, VisaFilter};
use ilr_data::DataSummary;
use serde::Serialize;

use super::report::JsonScenario;
use super::util;

/// JSON status structure.
#[derive(Debug, Serialize)]
struct JsonStatus<'a> {
    range_start: String,
    range_end: String,
    first_entry_date: String,
    target_days: i64,
    target_date: String,
    planning_date: String,
    calculation_date: String,
    days_since_entry: i64,
    no_visa_policy: NoVisaPolicy,
    counts: ClassCounts,
    data: &'a DataSummary,
    scenarios: Vec<JsonScenario>,
}

/// Runs the status command.
pub fn run<W: Write>(
    writer: &mut W,
    timeline: &Timeline,
    summary: &DataSummary,
    policy: NoVisaPolicy,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    let engine = StatsEngine::new(timeline, policy);
    let stats = engine.statistics(as_of, &VisaFilter::All);
    let config = timeline.config();

    if json {
        let status = JsonStatus {
            range_start: config.range_start().to_string(),
            range_end: config.range_end().to_string(),
            first_entry_date: config.first_entry_date().to_string(),
            target_days: config.target_days(),
            target_date: config.target_date().to_string(),
            planning_date: config.planning_date().to_string(),
            calculation_date: stats.calculation_date.to_string(),
            days_since_entry: stats.days_since_entry,
            no_visa_policy: policy,
            counts: stats.counts,
            data: summary,
            scenarios: vec![
                JsonScenario::from_result(&stats.in_uk),
                JsonScenario::from_result(&stats.total),
            ],
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&status)?)?;
        return Ok(());
    }

    writeln!(writer, "ILR residence status")?;
    writeln!(
        writer,
        "Range: {} to {}",
        util::fmt_date(config.range_start()),
        util::fmt_date(config.range_end())
    )?;
    writeln!(
        writer,
        "First entry: {}",
        util::fmt_date(config.first_entry_date())
    )?;
    writeln!(
        writer,
        "Target: {} days by {}",
        config.target_days(),
        util::fmt_date(config.target_date())
    )?;
    let buffer_years = config.processing_buffer_years();
    if buffer_years > 0 {
        let word = if buffer_years == 1 { "year" } else { "years" };
        writeln!(
            writer,
            "Plan for: {} ({buffer_years} {word} processing buffer)",
            util::fmt_date(config.planning_date())
        )?;
    }
    let days_word = if summary.days_abroad == 1 { "day" } else { "days" };
    writeln!(
        writer,
        "Data: {} trip{} ({} short, {} long), {} {days_word} abroad, {} visa period{}",
        summary.trip_count,
        util::plural(summary.trip_count),
        summary.short_trip_count,
        summary.long_trip_count,
        summary.days_abroad,
        summary.visa_period_count,
        util::plural(summary.visa_period_count)
    )?;
    writeln!(writer, "No-visa days: {policy}")?;

    writeln!(writer)?;
    writeln!(
        writer,
        "As of {} (day {} since entry):",
        util::fmt_date(stats.calculation_date),
        stats.days_since_entry
    )?;
    for result in [&stats.in_uk, &stats.total] {
        let bar = util::progress_bar(result.current_count, result.target_days);
        writeln!(
            writer,
            "{}: {} / {} days ({:.1}%)   {bar}",
            result.scenario.label(),
            result.current_count,
            result.target_days,
            result.percent_complete()
        )?;
        match result.projection {
            Projection::Achieved => {
                writeln!(writer, "       target met ({} days over)", result.days_over())?;
            }
            Projection::Projected(date) => {
                writeln!(
                    writer,
                    "       {} days remaining, projected completion {}",
                    result.remaining_days,
                    util::fmt_date(date)
                )?;
            }
            Projection::Unattainable => {
                writeln!(
                    writer,
                    "       {} days remaining, not reachable within the tracked range",
                    result.remaining_days
                )?;
            }
        }
    }

    Ok(())
}
