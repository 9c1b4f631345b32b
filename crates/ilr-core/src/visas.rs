//! Visa period records and the date-to-visa resolver.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityError;
use crate::span::{self, DateSpan};
use crate::types::VisaId;

/// A visa period with inclusive validity dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaPeriod {
    pub id: VisaId,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl VisaPeriod {
    /// Inclusive validity length in days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl DateSpan for VisaPeriod {
    fn span_start(&self) -> NaiveDate {
        self.start_date
    }

    fn span_end(&self) -> NaiveDate {
        self.end_date
    }
}

/// Resolves which visa period covers a given date.
///
/// Unlike trips, overlapping visa periods are tolerated: renewals are often
/// recorded with a day of overlap. A date covered by several periods
/// resolves to the one with the latest start date. Overlaps and coverage
/// gaps are logged at warn level during construction so they surface once,
/// not per lookup.
#[derive(Debug, Clone)]
pub struct VisaResolver {
    periods: Vec<VisaPeriod>,
}

impl VisaResolver {
    /// Validates the periods against the tracked range and sorts them by
    /// start date. Inverted dates or periods outside `[range_start,
    /// range_end]` are fatal.
    pub fn new(
        mut periods: Vec<VisaPeriod>,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Self, DataIntegrityError> {
        for period in &periods {
            if period.end_date < period.start_date {
                return Err(DataIntegrityError::VisaDatesInverted {
                    id: period.id.clone(),
                    start_date: period.start_date,
                    end_date: period.end_date,
                });
            }
            if period.start_date < range_start {
                return Err(DataIntegrityError::VisaStartsBeforeRange {
                    id: period.id.clone(),
                    start_date: period.start_date,
                    range_start,
                });
            }
            if period.end_date > range_end {
                return Err(DataIntegrityError::VisaEndsAfterRange {
                    id: period.id.clone(),
                    end_date: period.end_date,
                    range_end,
                });
            }
        }

        periods.sort_by(|a, b| (a.start_date, &a.id).cmp(&(b.start_date, &b.id)));

        for pair in periods.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.start_date <= previous.end_date {
                tracing::warn!(
                    first = %previous.id,
                    second = %next.id,
                    from = %next.start_date,
                    "visa periods overlap; the later-starting period wins lookups"
                );
            } else {
                let gap_days = (next.start_date - previous.end_date).num_days() - 1;
                if gap_days > 0 {
                    tracing::warn!(
                        after = %previous.id,
                        before = %next.id,
                        days = gap_days,
                        "gap in visa coverage between consecutive periods"
                    );
                }
            }
        }

        tracing::debug!(periods = periods.len(), "visa resolver built");
        Ok(Self { periods })
    }

    /// Returns the visa period covering `date`, if any.
    ///
    /// When several periods cover the date, the one with the latest start
    /// date wins; equal starts resolve to the greater id.
    pub fn resolve(&self, date: NaiveDate) -> Option<&VisaPeriod> {
        span::latest_span_covering(&self.periods, date)
    }

    /// All periods, ordered by start date.
    pub fn periods(&self) -> &[VisaPeriod] {
        &self.periods
    }

    /// Looks up a period by id.
    pub fn period(&self, id: &VisaId) -> Option<&VisaPeriod> {
        self.periods.iter().find(|period| &period.id == id)
    }

    /// One-based day number of `date` within the period, paired with the
    /// period's total duration. `None` if the id is unknown or the date
    /// falls outside the period.
    pub fn progress(&self, id: &VisaId, date: NaiveDate) -> Option<(i64, i64)> {
        let period = self.period(id)?;
        period
            .covers(date)
            .then(|| ((date - period.start_date).num_days() + 1, period.duration_days()))
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
