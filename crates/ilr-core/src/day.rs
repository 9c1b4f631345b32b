//! Day classification enum and the per-date Day record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TripId, VisaId};

/// Mutually exclusive classification of a single calendar day.
///
/// Every day in the timeline range carries exactly one of these. The string
/// form (`uk_residence`, `short_trip`, ...) is the stable serialized
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayClass {
    /// In the UK under visa coverage, on or after first entry.
    UkResidence,
    /// Abroad on a trip shorter than 14 days.
    ShortTrip,
    /// Abroad on a trip of 14 days or more.
    LongTrip,
    /// Before the first entry date; never ILR-relevant.
    PreEntry,
    /// On or after first entry, not on a trip, but no visa period covers it.
    NoVisaCoverage,
}

impl DayClass {
    /// Stable string form used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UkResidence => "uk_residence",
            Self::ShortTrip => "short_trip",
            Self::LongTrip => "long_trip",
            Self::PreEntry => "pre_entry",
            Self::NoVisaCoverage => "no_visa_coverage",
        }
    }

    /// Human-readable label for presentation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UkResidence => "UK residence",
            Self::ShortTrip => "Short trip",
            Self::LongTrip => "Long trip",
            Self::PreEntry => "Pre-entry",
            Self::NoVisaCoverage => "No visa coverage",
        }
    }

    /// True for the two trip classifications.
    #[must_use]
    pub const fn is_trip(self) -> bool {
        matches!(self, Self::ShortTrip | Self::LongTrip)
    }
}

impl fmt::Display for DayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DayClass {
    type Err = UnknownDayClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uk_residence" => Ok(Self::UkResidence),
            "short_trip" => Ok(Self::ShortTrip),
            "long_trip" => Ok(Self::LongTrip),
            "pre_entry" => Ok(Self::PreEntry),
            "no_visa_coverage" => Ok(Self::NoVisaCoverage),
            _ => Err(UnknownDayClass(s.to_string())),
        }
    }
}

impl Serialize for DayClass {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DayClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown day classification strings.
#[derive(Debug, Clone, Error)]
#[error("unknown day classification: {0}")]
pub struct UnknownDayClass(String);

/// One classified calendar day.
///
/// The covering ids record which trip and visa period span this date,
/// independently of the classification: a pre-entry or trip day still notes
/// the visa period that covers it. Built once per load cycle and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub class: DayClass,
    pub trip_id: Option<TripId>,
    pub visa_id: Option<VisaId>,
}
