//! Trips command listing recorded trips.

use std::io::Write;

use anyhow::Result;
use ilr_core::Timeline;
use ilr_data::DataSummary;

use super::util;

/// Runs the trips command.
pub fn run<W: Write>(
    writer: &mut W,
    timeline: &Timeline,
    summary: &DataSummary,
    json: bool,
) -> Result<()> {
    let trips = timeline.trips().trips();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(trips)?)?;
        return Ok(());
    }

    if trips.is_empty() {
        writeln!(writer, "No trips recorded.")?;
        return Ok(());
    }

    writeln!(writer, "TRIPS")?;
    writeln!(writer, "─────")?;
    for trip in trips {
        let kind = if trip.is_short() { "short" } else { "long" };
        writeln!(
            writer,
            "{:<16} {} to {}  {:>3} days  {:<5}  {}-{}",
            trip.id,
            util::fmt_date(trip.departure_date),
            util::fmt_date(trip.return_date),
            trip.length_days(),
            kind,
            trip.from_airport,
            trip.to_airport
        )?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "{} trip{} ({} short, {} long), {} days abroad",
        summary.trip_count,
        util::plural(summary.trip_count),
        summary.short_trip_count,
        summary.long_trip_count,
        summary.days_abroad
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use ilr_core::{Config, Trip, TripId, VisaId, VisaPeriod};
    use insta::assert_snapshot;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixture(trips: Vec<Trip>) -> (Timeline, DataSummary) {
        let config = Config::new(2023, 2025, d(2023, 3, 29), 10, 1).unwrap();
        let visas = vec![VisaPeriod {
            id: VisaId::new("skilled-worker").unwrap(),
            label: "Skilled Worker visa".to_string(),
            start_date: d(2023, 1, 1),
            end_date: d(2025, 12, 31),
        }];
        let summary = DataSummary::new(&trips, &visas);
        let timeline = Timeline::build(config, trips, visas).unwrap();
        (timeline, summary)
    }

    fn sample_trips() -> Vec<Trip> {
        vec![
            Trip {
                id: TripId::new("short-june").unwrap(),
                departure_date: d(2023, 6, 1),
                return_date: d(2023, 6, 10),
                from_airport: "LHR".to_string(),
                to_airport: "WAW".to_string(),
                notes: None,
            },
            Trip {
                id: TripId::new("long-august").unwrap(),
                departure_date: d(2023, 8, 1),
                return_date: d(2023, 8, 14),
                from_airport: "LGW".to_string(),
                to_airport: "JFK".to_string(),
                notes: None,
            },
        ]
    }

    #[test]
    fn lists_trips_in_departure_order_with_summary() {
        let (timeline, summary) = fixture(sample_trips());
        let mut output = Vec::new();
        run(&mut output, &timeline, &summary, false).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        TRIPS
        ─────
        short-june       01-06-2023 to 10-06-2023   10 days  short  LHR-WAW
        long-august      01-08-2023 to 14-08-2023   14 days  long   LGW-JFK

        2 trips (1 short, 1 long), 24 days abroad
        ");
    }

    #[test]
    fn empty_trips_prints_placeholder() {
        let (timeline, summary) = fixture(vec![]);
        let mut output = Vec::new();
        run(&mut output, &timeline, &summary, false).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(output, "No trips recorded.\n");
    }

    #[test]
    fn json_lists_all_trips() {
        let (timeline, summary) = fixture(sample_trips());
        let mut output = Vec::new();
        run(&mut output, &timeline, &summary, true).unwrap();
        let output = String::from_utf8(output).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let trips = json.as_array().unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0]["id"], "short-june");
        assert_eq!(trips[0]["departure_date"], "2023-06-01");
        assert_eq!(trips[1]["id"], "long-august");
        assert!(trips[0].get("notes").is_none());
    }
}
