//! Error types for configuration, data integrity and queries.
//!
//! Three distinct failure families: [`ConfigError`] is fatal at configuration
//! construction, [`DataIntegrityError`] is fatal at classifier or timeline
//! construction, and [`QueryError`] is per-call and leaves the timeline
//! snapshot valid. None of them are recovered internally; the caller fixes
//! the source data and rebuilds.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{TripId, VisaId};

/// Configuration validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `start_year` is outside the supported window.
    #[error("start_year must be between 2000 and 2100, got {year}")]
    StartYearOutOfRange { year: i32 },

    /// `end_year` is outside the supported window.
    #[error("end_year must be between 2000 and 2100, got {year}")]
    EndYearOutOfRange { year: i32 },

    /// The year range is empty or inverted.
    #[error("end_year ({end_year}) must be greater than start_year ({start_year})")]
    YearRangeInverted { start_year: i32, end_year: i32 },

    /// The first entry date falls outside the configured range.
    #[error(
        "first_entry_date ({first_entry_date}) must be between {range_start} and {range_end}"
    )]
    FirstEntryOutsideRange {
        first_entry_date: NaiveDate,
        range_start: NaiveDate,
        range_end: NaiveDate,
    },

    /// `objective_years` is zero or implausibly large.
    #[error("objective_years must be between 1 and 100, got {years}")]
    ObjectiveYearsOutOfRange { years: u32 },

    /// `processing_buffer_years` is implausibly large.
    #[error("processing_buffer_years must be at most 100, got {years}")]
    BufferYearsOutOfRange { years: u32 },
}

/// Source-data integrity failures, raised when a classifier is built.
///
/// Each variant carries the offending record id(s) and values so the caller
/// can fix the data. These failures reproduce deterministically until the
/// data is corrected and the snapshot rebuilt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    /// A trip returns before it departs.
    #[error(
        "trip '{id}': return_date ({return_date}) is before departure_date ({departure_date})"
    )]
    TripDatesInverted {
        id: TripId,
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },

    /// Two trips cover the same calendar date.
    #[error("date {date} is covered by overlapping trips '{first}' and '{second}'")]
    OverlappingTrips {
        date: NaiveDate,
        first: TripId,
        second: TripId,
    },

    /// A visa period ends before it starts.
    #[error("visa period '{id}': end_date ({end_date}) is before start_date ({start_date})")]
    VisaDatesInverted {
        id: VisaId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// A visa period begins before the configured timeline range.
    #[error(
        "visa period '{id}': start_date ({start_date}) is before the timeline start ({range_start})"
    )]
    VisaStartsBeforeRange {
        id: VisaId,
        start_date: NaiveDate,
        range_start: NaiveDate,
    },

    /// A visa period extends past the configured timeline range.
    #[error(
        "visa period '{id}': end_date ({end_date}) is beyond the timeline end ({range_end})"
    )]
    VisaEndsAfterRange {
        id: VisaId,
        end_date: NaiveDate,
        range_end: NaiveDate,
    },
}

/// Per-call query failures. The snapshot stays valid after any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The requested date is outside the configured timeline range.
    #[error("date {date} is outside the timeline range {range_start} to {range_end}")]
    DateOutOfRange {
        date: NaiveDate,
        range_start: NaiveDate,
        range_end: NaiveDate,
    },

    /// The requested range has its endpoints reversed.
    #[error("range start {start} is after range end {end}")]
    RangeInverted { start: NaiveDate, end: NaiveDate },

    /// The requested month number is not a calendar month.
    #[error("month must be between 1 and 12, got {month}")]
    MonthOutOfRange { month: u32 },

    /// The requested year is outside the configured timeline range.
    #[error("year {year} is outside the timeline range {start_year} to {end_year}")]
    YearOutOfRange {
        year: i32,
        start_year: i32,
        end_year: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn overlap_error_names_both_trips() {
        let err = DataIntegrityError::OverlappingTrips {
            date: d(2024, 6, 3),
            first: TripId::new("trip-a").unwrap(),
            second: TripId::new("trip-b").unwrap(),
        };
        let message = err.to_string();
        assert!(message.contains("trip-a"));
        assert!(message.contains("trip-b"));
        assert!(message.contains("2024-06-03"));
    }

    #[test]
    fn visa_range_error_names_period_and_bound() {
        let err = DataIntegrityError::VisaEndsAfterRange {
            id: VisaId::new("skilled-worker").unwrap(),
            end_date: d(2041, 1, 15),
            range_end: d(2040, 12, 31),
        };
        let message = err.to_string();
        assert!(message.contains("skilled-worker"));
        assert!(message.contains("2041-01-15"));
        assert!(message.contains("2040-12-31"));
    }

    #[test]
    fn query_error_reports_requested_date() {
        let err = QueryError::DateOutOfRange {
            date: d(1999, 12, 31),
            range_start: d(2023, 1, 1),
            range_end: d(2040, 12, 31),
        };
        assert!(err.to_string().contains("1999-12-31"));
    }
}
