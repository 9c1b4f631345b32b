//! Core domain logic for the ILR residence tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Configuration: the tracked range and the residence target
//! - Timeline: classifying every day of the range exactly once
//! - Statistics: qualifying-day counts, scenario progress and projections

pub mod config;
pub mod day;
pub mod error;
mod span;
pub mod stats;
pub mod timeline;
pub mod trips;
pub mod types;
pub mod visas;

pub use config::Config;
pub use day::{Day, DayClass, UnknownDayClass};
pub use error::{ConfigError, DataIntegrityError, QueryError};
pub use span::DateSpan;
pub use stats::{
    IlrStatistics, NoVisaPolicy, Projection, Scenario, ScenarioResult, StatsEngine,
    UnknownNoVisaPolicy, VisaFilter,
};
pub use timeline::{ClassCounts, RangeSummary, Timeline, Verbosity};
pub use trips::{LONG_TRIP_MIN_DAYS, Trip, TripClassifier};
pub use types::{TripId, ValidationError, VisaId};
pub use visas::{VisaPeriod, VisaResolver};
