//! Validated configuration with derived ILR target dates.

use chrono::{Months, NaiveDate};

use crate::error::ConfigError;

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;
const MAX_OBJECTIVE_YEARS: u32 = 100;
const MAX_BUFFER_YEARS: u32 = 100;

/// Validated application configuration.
///
/// Construction validates every field and computes the derived dates once:
/// the timeline range bounds, the ILR target date (first entry plus the
/// objective in exact calendar years, so leap days inside the span are
/// absorbed correctly and a Feb 29 entry clamps to Feb 28 in non-leap
/// years), the exact day requirement, and the planning date (target plus
/// the processing buffer). All accessors are infallible afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    start_year: i32,
    end_year: i32,
    first_entry_date: NaiveDate,
    objective_years: u32,
    processing_buffer_years: u32,
    range_start: NaiveDate,
    range_end: NaiveDate,
    target_date: NaiveDate,
    target_days: i64,
    planning_date: NaiveDate,
}

impl Config {
    pub fn new(
        start_year: i32,
        end_year: i32,
        first_entry_date: NaiveDate,
        objective_years: u32,
        processing_buffer_years: u32,
    ) -> Result<Self, ConfigError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&start_year) {
            return Err(ConfigError::StartYearOutOfRange { year: start_year });
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&end_year) {
            return Err(ConfigError::EndYearOutOfRange { year: end_year });
        }
        if end_year <= start_year {
            return Err(ConfigError::YearRangeInverted {
                start_year,
                end_year,
            });
        }
        if objective_years == 0 || objective_years > MAX_OBJECTIVE_YEARS {
            return Err(ConfigError::ObjectiveYearsOutOfRange {
                years: objective_years,
            });
        }
        if processing_buffer_years > MAX_BUFFER_YEARS {
            return Err(ConfigError::BufferYearsOutOfRange {
                years: processing_buffer_years,
            });
        }

        let range_start = NaiveDate::from_ymd_opt(start_year, 1, 1)
            .ok_or(ConfigError::StartYearOutOfRange { year: start_year })?;
        let range_end = NaiveDate::from_ymd_opt(end_year, 12, 31)
            .ok_or(ConfigError::EndYearOutOfRange { year: end_year })?;

        if first_entry_date < range_start || first_entry_date > range_end {
            return Err(ConfigError::FirstEntryOutsideRange {
                first_entry_date,
                range_start,
                range_end,
            });
        }

        let target_date = first_entry_date
            .checked_add_months(Months::new(objective_years * 12))
            .ok_or(ConfigError::ObjectiveYearsOutOfRange {
                years: objective_years,
            })?;
        let target_days = (target_date - first_entry_date).num_days();

        let planning_date = first_entry_date
            .checked_add_months(Months::new(
                (objective_years + processing_buffer_years) * 12,
            ))
            .ok_or(ConfigError::BufferYearsOutOfRange {
                years: processing_buffer_years,
            })?;

        Ok(Self {
            start_year,
            end_year,
            first_entry_date,
            objective_years,
            processing_buffer_years,
            range_start,
            range_end,
            target_date,
            target_days,
            planning_date,
        })
    }

    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    pub const fn end_year(&self) -> i32 {
        self.end_year
    }

    pub const fn first_entry_date(&self) -> NaiveDate {
        self.first_entry_date
    }

    pub const fn objective_years(&self) -> u32 {
        self.objective_years
    }

    pub const fn processing_buffer_years(&self) -> u32 {
        self.processing_buffer_years
    }

    /// First day of the timeline range (`start_year`-01-01).
    pub const fn range_start(&self) -> NaiveDate {
        self.range_start
    }

    /// Last day of the timeline range (`end_year`-12-31).
    pub const fn range_end(&self) -> NaiveDate {
        self.range_end
    }

    /// True if `date` falls inside the timeline range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range_start <= date && date <= self.range_end
    }

    /// The date on which the objective period of residence completes.
    pub const fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// Exact number of days between first entry and the target date.
    pub const fn target_days(&self) -> i64 {
        self.target_days
    }

    /// Target date plus the processing buffer; the latest comfortable
    /// application date.
    pub const fn planning_date(&self) -> NaiveDate {
        self.planning_date
    }
}
