//! The classified day-by-day timeline across the tracked range.
//!
//! A [`Timeline`] is built once from validated inputs and is immutable
//! afterwards. Every date in the tracked range gets exactly one [`Day`]
//! entry, so lookups are index arithmetic rather than repeated span
//! searches, and a rebuild after a data edit swaps the whole structure
//! atomically.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::day::{Day, DayClass};
use crate::error::{DataIntegrityError, QueryError};
use crate::trips::{Trip, TripClassifier};
use crate::visas::{VisaPeriod, VisaResolver};

/// Per-class day tallies over some slice of the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub uk_residence: u32,
    pub short_trip: u32,
    pub long_trip: u32,
    pub pre_entry: u32,
    pub no_visa_coverage: u32,
}

impl ClassCounts {
    pub fn tally(days: &[Day]) -> Self {
        let mut counts = Self::default();
        for day in days {
            counts.record(day.class);
        }
        counts
    }

    pub fn record(&mut self, class: DayClass) {
        match class {
            DayClass::UkResidence => self.uk_residence += 1,
            DayClass::ShortTrip => self.short_trip += 1,
            DayClass::LongTrip => self.long_trip += 1,
            DayClass::PreEntry => self.pre_entry += 1,
            DayClass::NoVisaCoverage => self.no_visa_coverage += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.uk_residence + self.short_trip + self.long_trip + self.pre_entry + self.no_visa_coverage
    }
}

/// How much day-level detail a summary should carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Summary,
    Detailed,
}

/// Counts for a date range, with the underlying days when detailed.
#[derive(Debug, Clone)]
pub struct RangeSummary<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub counts: ClassCounts,
    pub days: Option<&'a [Day]>,
}

/// The fully classified timeline for the tracked range.
#[derive(Debug, Clone)]
pub struct Timeline {
    config: Config,
    days: Vec<Day>,
    trips: TripClassifier,
    visas: VisaResolver,
}

impl Timeline {
    /// Validates trips and visa periods against the configuration and
    /// classifies every date in the tracked range.
    pub fn build(
        config: Config,
        trips: Vec<Trip>,
        visa_periods: Vec<VisaPeriod>,
    ) -> Result<Self, DataIntegrityError> {
        let trips = TripClassifier::new(trips)?;
        let visas = VisaResolver::new(visa_periods, config.range_start(), config.range_end())?;

        let first_entry = config.first_entry_date();
        let days: Vec<Day> = config
            .range_start()
            .iter_days()
            .take_while(|date| *date <= config.range_end())
            .map(|date| classify_date(date, first_entry, &trips, &visas))
            .collect();

        tracing::debug!(
            days = days.len(),
            trips = trips.len(),
            visa_periods = visas.len(),
            "timeline built"
        );
        Ok(Self {
            config,
            days,
            trips,
            visas,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Every day in the tracked range, in date order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub const fn trips(&self) -> &TripClassifier {
        &self.trips
    }

    pub const fn visas(&self) -> &VisaResolver {
        &self.visas
    }

    /// The classified day for `date`. O(1).
    pub fn day(&self, date: NaiveDate) -> Result<&Day, QueryError> {
        let index = self.index_of(date)?;
        Ok(&self.days[index])
    }

    /// Days in `[start, end]`, both bounds inside the tracked range.
    pub fn days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<&[Day], QueryError> {
        if start > end {
            return Err(QueryError::RangeInverted { start, end });
        }
        let lo = self.index_of(start)?;
        let hi = self.index_of(end)?;
        Ok(&self.days[lo..=hi])
    }

    /// Days in the given calendar month.
    pub fn days_in_month(&self, year: i32, month: u32) -> Result<&[Day], QueryError> {
        if !(1..=12).contains(&month) {
            return Err(QueryError::MonthOutOfRange { month });
        }
        self.check_year(year)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(QueryError::MonthOutOfRange { month })?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or(QueryError::MonthOutOfRange { month })?;
        self.days_in_range(first, last)
    }

    /// Days in the given calendar year.
    pub fn days_in_year(&self, year: i32) -> Result<&[Day], QueryError> {
        self.check_year(year)?;
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or(QueryError::YearOutOfRange {
                year,
                start_year: self.config.start_year(),
                end_year: self.config.end_year(),
            })?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or(QueryError::YearOutOfRange {
                year,
                start_year: self.config.start_year(),
                end_year: self.config.end_year(),
            })?;
        self.days_in_range(first, last)
    }

    /// Days from the start of the range through `date`, inclusive.
    /// `date` is clamped into the tracked range.
    pub fn days_through(&self, date: NaiveDate) -> &[Day] {
        let clamped = date.clamp(self.config.range_start(), self.config.range_end());
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clamping bounds the offset to the day vector length"
        )]
        let end = (clamped - self.config.range_start()).num_days() as usize;
        &self.days[..=end]
    }

    /// Days strictly after `date`. The whole range when `date` precedes
    /// it, empty when `date` is on or past the range end.
    pub fn days_after(&self, date: NaiveDate) -> &[Day] {
        if date < self.config.range_start() {
            return &self.days;
        }
        if date >= self.config.range_end() {
            return &[];
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "the bound checks above keep the offset inside the day vector"
        )]
        let offset = (date - self.config.range_start()).num_days() as usize;
        &self.days[offset + 1..]
    }

    pub fn counts_total(&self) -> ClassCounts {
        ClassCounts::tally(&self.days)
    }

    pub fn counts_for_month(&self, year: i32, month: u32) -> Result<ClassCounts, QueryError> {
        Ok(ClassCounts::tally(self.days_in_month(year, month)?))
    }

    pub fn counts_for_year(&self, year: i32) -> Result<ClassCounts, QueryError> {
        Ok(ClassCounts::tally(self.days_in_year(year)?))
    }

    /// Counts for `[start, end]`, with the day rows when detailed.
    pub fn summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        verbosity: Verbosity,
    ) -> Result<RangeSummary<'_>, QueryError> {
        let days = self.days_in_range(start, end)?;
        Ok(RangeSummary {
            start,
            end,
            counts: ClassCounts::tally(days),
            days: match verbosity {
                Verbosity::Summary => None,
                Verbosity::Detailed => Some(days),
            },
        })
    }

    fn index_of(&self, date: NaiveDate) -> Result<usize, QueryError> {
        if !self.config.contains(date) {
            return Err(QueryError::DateOutOfRange {
                date,
                range_start: self.config.range_start(),
                range_end: self.config.range_end(),
            });
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "the range check above bounds the offset to the day vector length"
        )]
        let index = (date - self.config.range_start()).num_days() as usize;
        Ok(index)
    }

    fn check_year(&self, year: i32) -> Result<(), QueryError> {
        if year < self.config.start_year() || year > self.config.end_year() {
            return Err(QueryError::YearOutOfRange {
                year,
                start_year: self.config.start_year(),
                end_year: self.config.end_year(),
            });
        }
        Ok(())
    }
}

/// Classifies one date. Precedence: pre-entry, then trips, then visa
/// coverage. The covering trip and visa ids are recorded either way so a
/// pre-entry day still shows which visa covered it.
fn classify_date(
    date: NaiveDate,
    first_entry: NaiveDate,
    trips: &TripClassifier,
    visas: &VisaResolver,
) -> Day {
    let trip = trips.classify(date);
    let visa = visas.resolve(date);

    let class = if date < first_entry {
        DayClass::PreEntry
    } else if let Some(trip) = trip {
        if trip.is_short() {
            DayClass::ShortTrip
        } else {
            DayClass::LongTrip
        }
    } else if visa.is_some() {
        DayClass::UkResidence
    } else {
        DayClass::NoVisaCoverage
    };

    Day {
        date,
        class,
        trip_id: trip.map(|t| t.id.clone()),
        visa_id: visa.map(|v| v.id.clone()),
    }
}
