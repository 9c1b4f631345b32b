//! Report command for period day-class breakdowns and residence progress.
//!
//! This module implements `ilr report` with period options (--year, --month)
//! and output formats (human-readable, JSON).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use ilr_core::{
    ClassCounts, Day, DayClass, IlrStatistics, NoVisaPolicy, Projection, ScenarioResult,
    StatsEngine, Timeline, VisaFilter, VisaId,
};
use serde::Serialize;

use super::util;

/// Report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The whole tracked range up to the calculation date.
    Global,
    Year(i32),
    Month { year: i32, month: u32 },
}

/// Period type for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Global,
    Year,
    Month,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData<'a> {
    pub period: Period,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub counts: ClassCounts,
    pub stats: IlrStatistics,
    pub policy: NoVisaPolicy,
    pub filter_ids: Vec<String>,
    pub days: Option<&'a [Day]>,
}

// ========== Report Generation ==========

/// Generates report data from the timeline.
///
/// Day counts cover the period; cumulative progress is measured at the
/// calculation date clamped into the period, so a mid-month report shows
/// progress through the calculation date and a past period shows progress
/// as of its final day.
pub fn generate_report_data<'a>(
    timeline: &'a Timeline,
    period: Period,
    as_of: NaiveDate,
    filter: &VisaFilter,
    policy: NoVisaPolicy,
    detailed: bool,
) -> Result<ReportData<'a>> {
    let engine = StatsEngine::new(timeline, policy);
    let config = timeline.config();

    let (day_slice, counts) = match period {
        Period::Global => {
            let end = as_of.clamp(config.range_start(), config.range_end());
            let slice = timeline.days_through(end);
            let counts = engine.counts_for_range(config.range_start(), end, filter)?;
            (slice, counts)
        }
        Period::Year(year) => (
            timeline.days_in_year(year)?,
            engine.counts_for_year(year, filter)?,
        ),
        Period::Month { year, month } => (
            timeline.days_in_month(year, month)?,
            engine.counts_for_month(year, month, filter)?,
        ),
    };

    let (Some(first), Some(last)) = (day_slice.first(), day_slice.last()) else {
        anyhow::bail!("period contains no days");
    };

    let stats_date = as_of.clamp(first.date, last.date);
    let stats = engine.statistics(stats_date, filter);

    let filter_ids = match filter {
        VisaFilter::All => Vec::new(),
        VisaFilter::Periods(ids) => ids.iter().map(ToString::to_string).collect(),
    };

    Ok(ReportData {
        period,
        period_start: first.date,
        period_end: last.date,
        counts,
        stats,
        policy,
        filter_ids,
        days: detailed.then_some(day_slice),
    })
}

// ========== Human-Readable Output ==========

fn format_period_description(data: &ReportData<'_>) -> String {
    match data.period {
        Period::Global => "Full range".to_string(),
        Period::Year(year) => year.to_string(),
        Period::Month { .. } => data.period_start.format("%B %Y").to_string(),
    }
}

fn write_projection_line(output: &mut String, result: &ScenarioResult) {
    match result.projection {
        Projection::Achieved => {
            writeln!(output, "{:<12}target met ({} days over)", "", result.days_over()).unwrap();
        }
        Projection::Projected(date) => {
            writeln!(
                output,
                "{:<12}{} days remaining, projected completion {}",
                "",
                result.remaining_days,
                util::fmt_date(date)
            )
            .unwrap();
        }
        Projection::Unattainable => {
            writeln!(
                output,
                "{:<12}{} days remaining, not reachable within the tracked range",
                "", result.remaining_days
            )
            .unwrap();
        }
    }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData<'_>) -> String {
    let mut output = String::new();

    let period_desc = format_period_description(data);
    let period_days = (data.period_end - data.period_start).num_days() + 1;

    writeln!(output, "ILR REPORT: {period_desc}").unwrap();
    writeln!(
        output,
        "Period: {} to {} ({period_days} days)",
        util::fmt_date(data.period_start),
        util::fmt_date(data.period_end)
    )
    .unwrap();
    if !data.filter_ids.is_empty() {
        writeln!(output, "Visa filter: {}", data.filter_ids.join(", ")).unwrap();
    }
    writeln!(output, "No-visa days: {}", data.policy).unwrap();

    // DAY CLASSES section
    writeln!(output).unwrap();
    writeln!(output, "DAY CLASSES").unwrap();
    writeln!(output, "───────────").unwrap();
    let rows = [
        (DayClass::UkResidence, data.counts.uk_residence),
        (DayClass::ShortTrip, data.counts.short_trip),
        (DayClass::LongTrip, data.counts.long_trip),
        (DayClass::PreEntry, data.counts.pre_entry),
        (DayClass::NoVisaCoverage, data.counts.no_visa_coverage),
    ];
    for (class, count) in rows {
        let bar = util::progress_bar(i64::from(count), period_days);
        writeln!(
            output,
            "{:<18}{count:>5}   {bar}",
            format!("{}:", class.label())
        )
        .unwrap();
    }

    // DAYS section (only with --detailed)
    if let Some(days) = data.days {
        writeln!(output).unwrap();
        writeln!(output, "DAYS").unwrap();
        writeln!(output, "────").unwrap();
        for day in days {
            let mut notes = Vec::new();
            if let Some(id) = &day.trip_id {
                notes.push(format!("trip {id}"));
            }
            if let Some(id) = &day.visa_id {
                notes.push(format!("visa {id}"));
            }
            if notes.is_empty() {
                writeln!(output, "{}  {}", util::fmt_date(day.date), day.class.label()).unwrap();
            } else {
                writeln!(
                    output,
                    "{}  {:<18}{}",
                    util::fmt_date(day.date),
                    day.class.label(),
                    notes.join(", ")
                )
                .unwrap();
            }
        }
    }

    // PROGRESS section
    writeln!(output).unwrap();
    writeln!(output, "PROGRESS").unwrap();
    writeln!(output, "────────").unwrap();
    writeln!(
        output,
        "{:<12}{} (day {} since entry)",
        "As of:",
        util::fmt_date(data.stats.calculation_date),
        data.stats.days_since_entry
    )
    .unwrap();
    writeln!(
        output,
        "{:<12}{} days by {}",
        "Target:",
        data.stats.in_uk.target_days,
        util::fmt_date(data.stats.in_uk.target_date)
    )
    .unwrap();

    for result in [&data.stats.in_uk, &data.stats.total] {
        let bar = util::progress_bar(result.current_count, result.target_days);
        writeln!(
            output,
            "{:<12}{} / {} days ({:.1}%)   {bar}",
            format!("{}:", result.scenario.label()),
            result.current_count,
            result.target_days,
            result.percent_complete()
        )
        .unwrap();
        write_projection_line(&mut output, result);
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub period: JsonPeriod,
    pub no_visa_policy: NoVisaPolicy,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub visa_filter: Vec<String>,
    pub counts: ClassCounts,
    pub progress: JsonProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<&'a [Day]>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub period_type: PeriodType,
}

#[derive(Debug, Serialize)]
pub struct JsonProgress {
    pub calculation_date: String,
    pub first_entry_date: String,
    pub days_since_entry: i64,
    pub scenarios: Vec<JsonScenario>,
}

/// Scenario progress as serialized in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonScenario {
    pub scenario: &'static str,
    pub current_count: i64,
    pub target_days: i64,
    pub target_date: String,
    pub remaining_days: i64,
    pub percent_complete: f64,
    pub projection: JsonProjection,
}

#[derive(Debug, Serialize)]
pub struct JsonProjection {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl JsonScenario {
    /// Builds the JSON form of a scenario result.
    pub fn from_result(result: &ScenarioResult) -> Self {
        let projection = match result.projection {
            Projection::Achieved => JsonProjection {
                status: "achieved",
                date: None,
            },
            Projection::Projected(date) => JsonProjection {
                status: "projected",
                date: Some(date.to_string()),
            },
            Projection::Unattainable => JsonProjection {
                status: "unattainable",
                date: None,
            },
        };

        Self {
            scenario: result.scenario.as_str(),
            current_count: result.current_count,
            target_days: result.target_days,
            target_date: result.target_date.to_string(),
            remaining_days: result.remaining_days,
            percent_complete: result.percent_complete(),
            projection,
        }
    }
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData<'_>) -> Result<String> {
    let period_type = match data.period {
        Period::Global => PeriodType::Global,
        Period::Year(_) => PeriodType::Year,
        Period::Month { .. } => PeriodType::Month,
    };

    let report = JsonReport {
        period: JsonPeriod {
            start: data.period_start.to_string(),
            end: data.period_end.to_string(),
            period_type,
        },
        no_visa_policy: data.policy,
        visa_filter: data.filter_ids.clone(),
        counts: data.counts,
        progress: JsonProgress {
            calculation_date: data.stats.calculation_date.to_string(),
            first_entry_date: data.stats.first_entry_date.to_string(),
            days_since_entry: data.stats.days_since_entry,
            scenarios: vec![
                JsonScenario::from_result(&data.stats.in_uk),
                JsonScenario::from_result(&data.stats.total),
            ],
        },
        days: data.days,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Options for the report command.
#[derive(Debug)]
pub struct ReportOptions {
    pub period: Period,
    pub as_of: NaiveDate,
    pub visa_ids: Vec<String>,
    pub policy: NoVisaPolicy,
    pub detailed: bool,
    pub json: bool,
}

/// Builds a visa filter from raw id arguments, rejecting unknown ids.
fn build_filter(timeline: &Timeline, ids: &[String]) -> Result<VisaFilter> {
    if ids.is_empty() {
        return Ok(VisaFilter::All);
    }

    let mut selected = Vec::with_capacity(ids.len());
    for raw in ids {
        let id = VisaId::new(raw.as_str())?;
        if timeline.visas().period(&id).is_none() {
            anyhow::bail!("unknown visa period id: {raw}");
        }
        selected.push(id);
    }

    Ok(VisaFilter::from_ids(selected))
}

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, timeline: &Timeline, options: &ReportOptions) -> Result<()> {
    let filter = build_filter(timeline, &options.visa_ids)?;
    let data = generate_report_data(
        timeline,
        options.period,
        options.as_of,
        &filter,
        options.policy,
        options.detailed,
    )?;

    if options.json {
        let output = format_report_json(&data)?;
        writeln!(writer, "{output}")?;
    } else {
        let output = format_report(&data);
        write!(writer, "{output}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilr_core::{Config, Trip, TripId, VisaPeriod};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn trip(id: &str, from: (i32, u32, u32), to: (i32, u32, u32)) -> Trip {
        Trip {
            id: TripId::new(id).unwrap(),
            departure_date: d(from.0, from.1, from.2),
            return_date: d(to.0, to.1, to.2),
            from_airport: "LHR".to_string(),
            to_airport: "WAW".to_string(),
            notes: None,
        }
    }

    fn visa(id: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> VisaPeriod {
        VisaPeriod {
            id: VisaId::new(id).unwrap(),
            label: id.to_string(),
            start_date: d(start.0, start.1, start.2),
            end_date: d(end.0, end.1, end.2),
        }
    }

    fn timeline() -> Timeline {
        let config = Config::new(2023, 2025, d(2023, 3, 29), 10, 1).unwrap();
        let trips = vec![
            trip("short-june", (2023, 6, 1), (2023, 6, 10)),
            trip("long-august", (2023, 8, 1), (2023, 8, 14)),
        ];
        let visas = vec![
            visa("graduate", (2023, 2, 1), (2024, 3, 28)),
            visa("skilled-worker", (2024, 3, 29), (2025, 6, 30)),
        ];
        Timeline::build(config, trips, visas).unwrap()
    }

    // ========== Report Generation ==========

    #[test]
    fn test_month_report_counts_and_period_end_stats() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Month {
                year: 2023,
                month: 6,
            },
            d(2023, 12, 31),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        assert_eq!(data.period_start, d(2023, 6, 1));
        assert_eq!(data.period_end, d(2023, 6, 30));
        assert_eq!(data.counts.uk_residence, 20);
        assert_eq!(data.counts.short_trip, 10);
        assert_eq!(data.counts.total(), 30);

        // Cumulative progress is clamped into the period
        assert_eq!(data.stats.calculation_date, d(2023, 6, 30));
        assert_eq!(data.stats.in_uk.current_count, 84);
        assert_eq!(data.stats.total.current_count, 94);
        assert!(data.days.is_none());
    }

    #[test]
    fn test_year_report_counts() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Year(2024),
            d(2025, 12, 31),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        assert_eq!(data.period_start, d(2024, 1, 1));
        assert_eq!(data.period_end, d(2024, 12, 31));
        assert_eq!(data.counts.uk_residence, 366);
        assert_eq!(data.counts.total(), 366);
        assert_eq!(data.stats.calculation_date, d(2024, 12, 31));
    }

    #[test]
    fn test_global_report_clamps_calculation_date() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Global,
            d(2030, 6, 15),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        assert_eq!(data.period_start, d(2023, 1, 1));
        assert_eq!(data.period_end, d(2025, 12, 31));
        assert_eq!(data.counts.total(), 1096);
        assert_eq!(data.counts.uk_residence, 801);
        assert_eq!(data.counts.no_visa_coverage, 184);
    }

    #[test]
    fn test_report_rejects_year_outside_range() {
        let timeline = timeline();
        let err = generate_report_data(
            &timeline,
            Period::Year(2026),
            d(2025, 1, 1),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap_err();

        assert!(err.to_string().contains("outside the timeline range"));
    }

    #[test]
    fn test_visa_filter_restricts_counts() {
        let timeline = timeline();
        let filter = build_filter(&timeline, &["graduate".to_string()]).unwrap();
        let data = generate_report_data(
            &timeline,
            Period::Global,
            d(2025, 12, 31),
            &filter,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        assert_eq!(data.counts.uk_residence, 342);
        assert_eq!(data.counts.short_trip, 10);
        assert_eq!(data.counts.long_trip, 14);
        assert_eq!(data.counts.pre_entry, 56);
        assert_eq!(data.counts.no_visa_coverage, 0);
        assert_eq!(data.filter_ids, vec!["graduate".to_string()]);
    }

    #[test]
    fn test_build_filter_rejects_unknown_id() {
        let timeline = timeline();
        let err = build_filter(&timeline, &["nonexistent".to_string()]).unwrap_err();
        assert!(
            err.to_string()
                .contains("unknown visa period id: nonexistent")
        );
    }

    #[test]
    fn test_excluded_policy_flows_into_progress() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Global,
            d(2025, 12, 31),
            &VisaFilter::All,
            NoVisaPolicy::Excluded,
            false,
        )
        .unwrap();

        // 801 UK residence + 10 short trip; the 184 uncovered days are excluded
        assert_eq!(data.stats.total.current_count, 811);
        let output = format_report(&data);
        assert!(output.contains("No-visa days: excluded"));
    }

    // ========== Formatting ==========

    #[test]
    fn test_format_report_sections() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Month {
                year: 2023,
                month: 6,
            },
            d(2023, 12, 31),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        let output = format_report(&data);
        assert!(output.contains("ILR REPORT: June 2023"));
        assert!(output.contains("Period: 01-06-2023 to 30-06-2023 (30 days)"));
        assert!(output.contains("No-visa days: counted"));
        assert!(output.contains("UK residence:        20"));
        assert!(output.contains("Short trip:          10"));
        assert!(output.contains("As of:      30-06-2023 (day 94 since entry)"));
        assert!(output.contains("Target:     3653 days by 29-03-2033"));
        assert!(output.contains("In-UK:      84 / 3653 days (2.3%)"));
        assert!(output.contains("Total:      94 / 3653 days (2.6%)"));
        assert!(output.contains("not reachable within the tracked range"));
        assert!(!output.contains("Visa filter:"));
    }

    #[test]
    fn test_format_report_shows_filter_line() {
        let timeline = timeline();
        let filter = build_filter(&timeline, &["graduate".to_string()]).unwrap();
        let data = generate_report_data(
            &timeline,
            Period::Global,
            d(2025, 12, 31),
            &filter,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        let output = format_report(&data);
        assert!(output.contains("Visa filter: graduate"));
    }

    #[test]
    fn test_format_report_detailed_day_lines() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Month {
                year: 2023,
                month: 6,
            },
            d(2023, 6, 30),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            true,
        )
        .unwrap();

        let output = format_report(&data);
        assert!(output.contains("DAYS"));
        assert!(output.contains("01-06-2023  Short trip        trip short-june, visa graduate"));
        assert!(output.contains("11-06-2023  UK residence      visa graduate"));

        // One line per day of June
        let day_lines = output
            .lines()
            .filter(|line| line.ends_with("visa graduate"))
            .count();
        assert_eq!(day_lines, 30);
    }

    #[test]
    fn test_format_report_json_structure() {
        let timeline = timeline();
        let data = generate_report_data(
            &timeline,
            Period::Month {
                year: 2023,
                month: 6,
            },
            d(2023, 12, 31),
            &VisaFilter::All,
            NoVisaPolicy::Counted,
            false,
        )
        .unwrap();

        let output = format_report_json(&data).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["period"]["type"], "month");
        assert_eq!(json["period"]["start"], "2023-06-01");
        assert_eq!(json["period"]["end"], "2023-06-30");
        assert_eq!(json["no_visa_policy"], "counted");
        assert_eq!(json["counts"]["uk_residence"], 20);
        assert_eq!(json["counts"]["short_trip"], 10);
        assert_eq!(json["progress"]["calculation_date"], "2023-06-30");
        assert_eq!(json["progress"]["scenarios"][0]["scenario"], "in_uk");
        assert_eq!(json["progress"]["scenarios"][0]["current_count"], 84);
        assert_eq!(json["progress"]["scenarios"][1]["scenario"], "total");
        assert_eq!(json["progress"]["scenarios"][1]["current_count"], 94);
        assert!(json.get("visa_filter").is_none());
        assert!(json.get("days").is_none());
    }

    #[test]
    fn test_run_writes_json_to_writer() {
        let timeline = timeline();
        let options = ReportOptions {
            period: Period::Year(2024),
            as_of: d(2024, 12, 31),
            visa_ids: vec![],
            policy: NoVisaPolicy::Counted,
            detailed: false,
            json: true,
        };

        let mut buffer = Vec::new();
        run(&mut buffer, &timeline, &options).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["counts"]["uk_residence"], 366);
        assert_eq!(json["period"]["type"], "year");
    }
}
