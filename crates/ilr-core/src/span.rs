//! Inclusive date spans and lookup helpers over sorted span slices.

use chrono::NaiveDate;

/// An inclusive span of calendar dates.
///
/// Implemented by trips and visa periods so coverage and overlap logic is
/// written once. Both bounds are inclusive.
pub trait DateSpan {
    fn span_start(&self) -> NaiveDate;
    fn span_end(&self) -> NaiveDate;

    /// True if `date` falls inside the span.
    fn covers(&self, date: NaiveDate) -> bool {
        self.span_start() <= date && date <= self.span_end()
    }

    /// Number of calendar days in the span, both endpoints included.
    fn length_days(&self) -> i64 {
        (self.span_end() - self.span_start()).num_days() + 1
    }

    /// True if the span shares at least one date with `[start, end]`.
    fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.span_start() <= end && self.span_end() >= start
    }
}

/// Returns the first overlapping pair among spans sorted by start date.
///
/// Sorted input means any overlap shows up between neighbours, so one
/// adjacent-pair scan is enough.
pub fn find_overlap<T: DateSpan>(sorted: &[T]) -> Option<(&T, &T)> {
    sorted
        .windows(2)
        .map(|pair| (&pair[0], &pair[1]))
        .find(|(previous, next)| next.span_start() <= previous.span_end())
}

/// Binary-searches sorted, non-overlapping spans for the one covering `date`.
///
/// With no overlaps at most one span can cover a date, so the span with the
/// greatest start on or before `date` is the only candidate.
pub fn span_covering<T: DateSpan>(sorted: &[T], date: NaiveDate) -> Option<&T> {
    let idx = sorted.partition_point(|span| span.span_start() <= date);
    let candidate = sorted[..idx].last()?;
    candidate.covers(date).then_some(candidate)
}

/// Finds the latest-starting span covering `date`, tolerating overlaps.
///
/// Scans backwards from the last span starting on or before `date`; the
/// first hit is the one with the latest start, which is the documented
/// tie-break when spans overlap.
pub fn latest_span_covering<T: DateSpan>(sorted: &[T], date: NaiveDate) -> Option<&T> {
    let idx = sorted.partition_point(|span| span.span_start() <= date);
    sorted[..idx].iter().rev().find(|span| span.covers(date))
}

/// Returns the contiguous run of spans overlapping `[start, end]`.
///
/// Requires sorted, non-overlapping spans; then end dates are ordered too
/// and the overlapping spans form one contiguous slice.
pub fn spans_overlapping_range<T: DateSpan>(
    sorted: &[T],
    start: NaiveDate,
    end: NaiveDate,
) -> &[T] {
    let lo = sorted.partition_point(|span| span.span_end() < start);
    let hi = sorted.partition_point(|span| span.span_start() <= end);
    &sorted[lo..hi]
}
