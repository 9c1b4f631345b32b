//! Day command explaining how a single date is classified.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use ilr_core::{NoVisaPolicy, Scenario, Timeline};

use super::util;

/// Runs the day command.
pub fn run<W: Write>(
    writer: &mut W,
    timeline: &Timeline,
    date: NaiveDate,
    policy: NoVisaPolicy,
) -> Result<()> {
    let day = timeline.day(date)?;

    writeln!(writer, "{}: {}", util::fmt_date(date), day.class.label())?;

    if let Some(id) = &day.trip_id {
        if let Some(trip) = timeline.trips().trip(id) {
            let kind = if trip.is_short() { "short" } else { "long" };
            writeln!(
                writer,
                "Trip: {id} ({}-{}, {} to {}, {} days, {kind})",
                trip.from_airport,
                trip.to_airport,
                util::fmt_date(trip.departure_date),
                util::fmt_date(trip.return_date),
                trip.length_days()
            )?;
            if let Some(notes) = &trip.notes {
                writeln!(writer, "Notes: {notes}")?;
            }
        }
    }

    if let Some(id) = &day.visa_id {
        if let Some(period) = timeline.visas().period(id) {
            if let Some((day_number, duration)) = timeline.visas().progress(id, date) {
                writeln!(
                    writer,
                    "Visa: {id} ({}), day {day_number} of {duration}",
                    period.label
                )?;
            }
        }
    }

    let in_uk = Scenario::InUk.qualifies(day.class, policy);
    let total = Scenario::Total.qualifies(day.class, policy);
    let verdict = match (in_uk, total) {
        (true, true) => "counts toward ILR in both scenarios",
        (false, true) => "counts toward ILR in the Total scenario only",
        (true, false) => "counts toward ILR in the In-UK scenario only",
        (false, false) => "does not count toward ILR",
    };
    writeln!(writer, "This day {verdict}.")?;

    Ok(())
}
