//! ILR qualification counting, scenario progress and completion projection.
//!
//! Two scenarios are tracked side by side against the same target: the
//! conservative In-UK count (days physically in the UK) and the Total
//! count (In-UK plus short trips, which Home Office guidance does not
//! deduct). The gap between them is exactly the short-trip days, so the
//! pair brackets the applicant's real position.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::{Day, DayClass};
use crate::error::QueryError;
use crate::timeline::{ClassCounts, Timeline};
use crate::types::VisaId;

/// A counting scenario: which day classes contribute to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Days physically present in the UK.
    InUk,
    /// In-UK days plus short trips.
    Total,
}

impl Scenario {
    pub const ALL: [Self; 2] = [Self::InUk, Self::Total];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InUk => "in_uk",
            Self::Total => "total",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InUk => "In-UK",
            Self::Total => "Total",
        }
    }

    /// Whether a day of `class` counts toward this scenario.
    #[must_use]
    pub const fn qualifies(self, class: DayClass, policy: NoVisaPolicy) -> bool {
        match class {
            DayClass::UkResidence => true,
            DayClass::ShortTrip => matches!(self, Self::Total),
            DayClass::LongTrip | DayClass::PreEntry => false,
            DayClass::NoVisaCoverage => matches!(policy, NoVisaPolicy::Counted),
        }
    }

    /// Qualifying-day total for this scenario out of per-class counts.
    #[must_use]
    pub const fn qualifying_days(self, counts: &ClassCounts, policy: NoVisaPolicy) -> u32 {
        let no_visa = match policy {
            NoVisaPolicy::Counted => counts.no_visa_coverage,
            NoVisaPolicy::Excluded => 0,
        };
        match self {
            Self::InUk => counts.uk_residence + no_visa,
            Self::Total => counts.uk_residence + counts.short_trip + no_visa,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How days without visa coverage are counted.
///
/// The tracker cannot tell an unrecorded visa from a genuine gap in
/// leave, so the treatment is an explicit choice rather than a silent
/// assumption. `Counted` is the default: in practice coverage gaps are
/// almost always missing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoVisaPolicy {
    #[default]
    Counted,
    Excluded,
}

impl NoVisaPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Counted => "counted",
            Self::Excluded => "excluded",
        }
    }
}

impl fmt::Display for NoVisaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoVisaPolicy {
    type Err = UnknownNoVisaPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counted" => Ok(Self::Counted),
            "excluded" => Ok(Self::Excluded),
            _ => Err(UnknownNoVisaPolicy(s.to_string())),
        }
    }
}

impl Serialize for NoVisaPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NoVisaPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown no-visa policy strings.
#[derive(Debug, Clone, Error)]
#[error("unknown no-visa policy: {0} (expected counted or excluded)")]
pub struct UnknownNoVisaPolicy(String);

/// Day-level visa filter applied to counting queries.
///
/// An explicit period set keeps only days whose covering visa is in the
/// set; days with no covering visa never match an explicit filter. An
/// empty set therefore matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisaFilter {
    #[default]
    All,
    Periods(BTreeSet<VisaId>),
}

impl VisaFilter {
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = VisaId>,
    {
        Self::Periods(ids.into_iter().collect())
    }

    #[must_use]
    pub fn matches(&self, day: &Day) -> bool {
        match self {
            Self::All => true,
            Self::Periods(ids) => day.visa_id.as_ref().is_some_and(|id| ids.contains(id)),
        }
    }
}

/// Outcome of walking the future timeline toward the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The target is already met as of the calculation date.
    Achieved,
    /// The date the target is reached if recorded plans hold.
    Projected(NaiveDate),
    /// The target cannot be reached within the tracked range.
    Unattainable,
}

/// Progress of one scenario against the residence target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub current_count: i64,
    pub target_days: i64,
    pub target_date: NaiveDate,
    pub remaining_days: i64,
    pub projection: Projection,
}

impl ScenarioResult {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.remaining_days == 0
    }

    /// Progress toward the target as a percentage, capped at 100.
    #[must_use]
    pub fn percent_complete(&self) -> f64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "day counts are far below f64 precision limits"
        )]
        let ratio = self.current_count as f64 / self.target_days as f64;
        (ratio * 100.0).min(100.0)
    }

    /// Days accumulated beyond the requirement, zero until it is met.
    #[must_use]
    pub const fn days_over(&self) -> i64 {
        let over = self.current_count - self.target_days;
        if over > 0 { over } else { 0 }
    }
}

/// Raw counts plus both scenario results for one calculation date.
#[derive(Debug, Clone, Copy)]
pub struct IlrStatistics {
    pub counts: ClassCounts,
    pub in_uk: ScenarioResult,
    pub total: ScenarioResult,
    pub calculation_date: NaiveDate,
    pub first_entry_date: NaiveDate,
    pub days_since_entry: i64,
}

impl IlrStatistics {
    #[must_use]
    pub const fn scenario(&self, scenario: Scenario) -> &ScenarioResult {
        match scenario {
            Scenario::InUk => &self.in_uk,
            Scenario::Total => &self.total,
        }
    }
}

/// Counting engine over a built timeline.
///
/// Carries the no-visa policy so every count, scenario and projection in
/// one run answers under the same rules.
#[derive(Debug, Clone, Copy)]
pub struct StatsEngine<'a> {
    timeline: &'a Timeline,
    policy: NoVisaPolicy,
}

impl<'a> StatsEngine<'a> {
    #[must_use]
    pub const fn new(timeline: &'a Timeline, policy: NoVisaPolicy) -> Self {
        Self { timeline, policy }
    }

    #[must_use]
    pub const fn policy(&self) -> NoVisaPolicy {
        self.policy
    }

    #[must_use]
    pub const fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    pub fn counts_total(&self, filter: &VisaFilter) -> ClassCounts {
        tally_filtered(self.timeline.days(), filter)
    }

    pub fn counts_for_year(
        &self,
        year: i32,
        filter: &VisaFilter,
    ) -> Result<ClassCounts, QueryError> {
        Ok(tally_filtered(self.timeline.days_in_year(year)?, filter))
    }

    pub fn counts_for_month(
        &self,
        year: i32,
        month: u32,
        filter: &VisaFilter,
    ) -> Result<ClassCounts, QueryError> {
        Ok(tally_filtered(self.timeline.days_in_month(year, month)?, filter))
    }

    pub fn counts_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filter: &VisaFilter,
    ) -> Result<ClassCounts, QueryError> {
        Ok(tally_filtered(self.timeline.days_in_range(start, end)?, filter))
    }

    /// Progress of one scenario as of `as_of`, which is clamped into the
    /// tracked range. Counting runs from the range start through the
    /// clamped date inclusive.
    pub fn scenario_result(
        &self,
        scenario: Scenario,
        as_of: NaiveDate,
        filter: &VisaFilter,
    ) -> ScenarioResult {
        let config = self.timeline.config();
        let effective = self.effective_date(as_of);
        let counts = tally_filtered(self.timeline.days_through(effective), filter);
        let current_count = i64::from(scenario.qualifying_days(&counts, self.policy));
        let target_days = config.target_days();
        let remaining_days = (target_days - current_count).max(0);
        let projection = self.project(scenario, effective, filter, remaining_days);
        ScenarioResult {
            scenario,
            current_count,
            target_days,
            target_date: config.target_date(),
            remaining_days,
            projection,
        }
    }

    /// The full dashboard for one calculation date.
    pub fn statistics(&self, as_of: NaiveDate, filter: &VisaFilter) -> IlrStatistics {
        let config = self.timeline.config();
        let effective = self.effective_date(as_of);
        let counts = tally_filtered(self.timeline.days_through(effective), filter);
        IlrStatistics {
            counts,
            in_uk: self.scenario_result(Scenario::InUk, as_of, filter),
            total: self.scenario_result(Scenario::Total, as_of, filter),
            calculation_date: effective,
            first_entry_date: config.first_entry_date(),
            days_since_entry: ((effective - config.first_entry_date()).num_days() + 1).max(0),
        }
    }

    /// Walks the future timeline under the same qualify predicate used for
    /// counting. Already-recorded future trips therefore push the
    /// projected date out.
    fn project(
        &self,
        scenario: Scenario,
        effective: NaiveDate,
        filter: &VisaFilter,
        remaining: i64,
    ) -> Projection {
        if remaining == 0 {
            return Projection::Achieved;
        }
        let mut left = remaining;
        for day in self.timeline.days_after(effective) {
            if filter.matches(day) && scenario.qualifies(day.class, self.policy) {
                left -= 1;
                if left == 0 {
                    return Projection::Projected(day.date);
                }
            }
        }
        Projection::Unattainable
    }

    fn effective_date(&self, as_of: NaiveDate) -> NaiveDate {
        let config = self.timeline.config();
        as_of.clamp(config.range_start(), config.range_end())
    }
}

fn tally_filtered(days: &[Day], filter: &VisaFilter) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for day in days {
        if filter.matches(day) {
            counts.record(day.class);
        }
    }
    counts
}
