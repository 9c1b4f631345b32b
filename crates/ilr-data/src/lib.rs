//! JSON file store for the ILR residence tracker.
//!
//! All data lives in three human-editable JSON files inside one data
//! directory; editing a file and re-running the tool is the whole update
//! workflow.
//!
//! - `config.json`: an object with the tracked range and target settings.
//!   Missing keys fall back to defaults, unknown keys are ignored.
//! - `trips.json`: an array of trip records.
//! - `visaPeriods.json`: an array of visa period records. The camelCase
//!   file name is the store's on-disk contract; existing data directories
//!   keep working as-is.
//!
//! # Date Format
//!
//! Every date in the files is `DD-MM-YYYY` (e.g. `29-03-2023`). Loaders
//! reject anything else with an error naming the record, the field and
//! the offending value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use ilr_core::{
    Config, ConfigError, DataIntegrityError, Timeline, Trip, TripId, VisaId, VisaPeriod,
};

pub const CONFIG_FILE: &str = "config.json";
pub const TRIPS_FILE: &str = "trips.json";
pub const VISA_PERIODS_FILE: &str = "visaPeriods.json";

/// The on-disk date format.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Data store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required data file is missing.
    #[error("data file not found: {} (run `ilr init` to create starter files)", path.display())]
    NotFound { path: PathBuf },
    /// Reading a data file failed for a reason other than absence.
    #[error("failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing a data file failed.
    #[error("failed to write {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A data file is not valid JSON.
    #[error("invalid JSON in {file}")]
    Json {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A data file parsed but has the wrong top-level shape.
    #[error("{file} must contain a JSON array")]
    NotAnArray { file: &'static str },
    /// A record within a data file is malformed.
    #[error("invalid record at index {index} of {file}: {message}")]
    Record {
        file: &'static str,
        index: usize,
        message: String,
    },
    /// A date string does not match the on-disk format.
    #[error("invalid date '{value}' for {field} of {owner} in {file}: expected DD-MM-YYYY")]
    InvalidDate {
        file: &'static str,
        owner: String,
        field: &'static str,
        value: String,
    },
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The loaded data failed cross-record validation.
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
}

/// Shape of the loaded data, for display before any counting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub trip_count: usize,
    pub short_trip_count: usize,
    pub long_trip_count: usize,
    pub days_abroad: i64,
    pub first_departure: Option<NaiveDate>,
    pub last_return: Option<NaiveDate>,
    pub visa_period_count: usize,
}

impl DataSummary {
    #[must_use]
    pub fn new(trips: &[Trip], periods: &[VisaPeriod]) -> Self {
        let short_trip_count = trips.iter().filter(|trip| trip.is_short()).count();
        Self {
            trip_count: trips.len(),
            short_trip_count,
            long_trip_count: trips.len() - short_trip_count,
            days_abroad: trips.iter().map(Trip::length_days).sum(),
            first_departure: trips.iter().map(|trip| trip.departure_date).min(),
            last_return: trips.iter().map(|trip| trip.return_date).max(),
            visa_period_count: periods.len(),
        }
    }
}

/// Handle on one data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn trips_path(&self) -> PathBuf {
        self.dir.join(TRIPS_FILE)
    }

    #[must_use]
    pub fn visa_periods_path(&self) -> PathBuf {
        self.dir.join(VISA_PERIODS_FILE)
    }

    /// Loads and validates `config.json`. Missing keys take defaults.
    pub fn load_config(&self) -> Result<Config, StoreError> {
        let path = self.config_path();
        let text = read_file(&path)?;
        let raw: RawConfig = serde_json::from_str(&text).map_err(|source| StoreError::Json {
            file: CONFIG_FILE,
            source,
        })?;

        if !raw.travel_pdf_folder.is_empty() {
            tracing::debug!(
                folder = %raw.travel_pdf_folder,
                "travel document folder configured (not used by the engine)"
            );
        }

        let first_entry_date =
            parse_date(&raw.first_entry_date).map_err(|_| StoreError::InvalidDate {
                file: CONFIG_FILE,
                owner: "config".to_string(),
                field: "first_entry_date",
                value: raw.first_entry_date.clone(),
            })?;

        let config = Config::new(
            raw.start_year,
            raw.end_year,
            first_entry_date,
            raw.objective_years,
            raw.processing_buffer_years,
        )?;
        tracing::debug!(
            range_start = %config.range_start(),
            range_end = %config.range_end(),
            target_date = %config.target_date(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Loads `trips.json`. Record order in the file does not matter.
    pub fn load_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let items = self.load_array(TRIPS_FILE)?;
        let mut trips = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let raw: RawTrip =
                serde_json::from_value(item).map_err(|err| StoreError::Record {
                    file: TRIPS_FILE,
                    index,
                    message: err.to_string(),
                })?;
            trips.push(raw.into_trip(index)?);
        }
        tracing::debug!(trips = trips.len(), "loaded trips");
        Ok(trips)
    }

    /// Loads `visaPeriods.json`. Record order in the file does not matter.
    pub fn load_visa_periods(&self) -> Result<Vec<VisaPeriod>, StoreError> {
        let items = self.load_array(VISA_PERIODS_FILE)?;
        let mut periods = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let raw: RawVisaPeriod =
                serde_json::from_value(item).map_err(|err| StoreError::Record {
                    file: VISA_PERIODS_FILE,
                    index,
                    message: err.to_string(),
                })?;
            periods.push(raw.into_period(index)?);
        }
        tracing::debug!(periods = periods.len(), "loaded visa periods");
        Ok(periods)
    }

    /// Loads all three files without building the timeline.
    pub fn load_all(&self) -> Result<(Config, Vec<Trip>, Vec<VisaPeriod>), StoreError> {
        let config = self.load_config()?;
        let trips = self.load_trips()?;
        let periods = self.load_visa_periods()?;
        Ok((config, trips, periods))
    }

    /// Loads everything and builds the classified timeline.
    pub fn load_timeline(&self) -> Result<Timeline, StoreError> {
        let (config, trips, periods) = self.load_all()?;
        Ok(Timeline::build(config, trips, periods)?)
    }

    /// Creates the data directory and writes a starter version of each
    /// data file that does not exist yet. Returns the paths written.
    /// Existing files are never touched.
    pub fn write_starter_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::WriteFile {
            path: self.dir.clone(),
            source,
        })?;

        let mut written = Vec::new();
        for (name, content) in [
            (CONFIG_FILE, STARTER_CONFIG),
            (TRIPS_FILE, STARTER_TRIPS),
            (VISA_PERIODS_FILE, STARTER_VISA_PERIODS),
        ] {
            let path = self.dir.join(name);
            if path.exists() {
                tracing::debug!(path = %path.display(), "data file already exists, leaving it");
                continue;
            }
            fs::write(&path, content).map_err(|source| StoreError::WriteFile {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        Ok(written)
    }

    fn load_array(&self, file: &'static str) -> Result<Vec<Value>, StoreError> {
        let path = self.dir.join(file);
        let text = read_file(&path)?;
        let value: Value =
            serde_json::from_str(&text).map_err(|source| StoreError::Json { file, source })?;
        match value {
            Value::Array(items) => Ok(items),
            _ => Err(StoreError::NotAnArray { file }),
        }
    }
}

const STARTER_CONFIG: &str = r#"{
  "start_year": 2023,
  "end_year": 2040,
  "first_entry_date": "29-03-2023",
  "objective_years": 10,
  "processing_buffer_years": 1,
  "travel_pdf_folder": "../travel_pdfs"
}
"#;

const STARTER_TRIPS: &str = "[]\n";

const STARTER_VISA_PERIODS: &str = "[]\n";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    start_year: i32,
    end_year: i32,
    first_entry_date: String,
    objective_years: u32,
    processing_buffer_years: u32,
    travel_pdf_folder: String,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            start_year: 2023,
            end_year: 2040,
            first_entry_date: "29-03-2023".to_string(),
            objective_years: 10,
            processing_buffer_years: 1,
            travel_pdf_folder: "../travel_pdfs".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    id: String,
    departure_date: String,
    return_date: String,
    from_airport: String,
    to_airport: String,
    #[serde(default)]
    notes: Option<String>,
}

impl RawTrip {
    fn into_trip(self, index: usize) -> Result<Trip, StoreError> {
        let id = TripId::new(self.id.as_str()).map_err(|err| StoreError::Record {
            file: TRIPS_FILE,
            index,
            message: err.to_string(),
        })?;
        let departure_date =
            parse_date(&self.departure_date).map_err(|_| StoreError::InvalidDate {
                file: TRIPS_FILE,
                owner: format!("trip {}", self.id),
                field: "departure_date",
                value: self.departure_date.clone(),
            })?;
        let return_date = parse_date(&self.return_date).map_err(|_| StoreError::InvalidDate {
            file: TRIPS_FILE,
            owner: format!("trip {}", self.id),
            field: "return_date",
            value: self.return_date.clone(),
        })?;
        Ok(Trip {
            id,
            departure_date,
            return_date,
            from_airport: self.from_airport,
            to_airport: self.to_airport,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawVisaPeriod {
    id: String,
    label: String,
    start_date: String,
    end_date: String,
}

impl RawVisaPeriod {
    fn into_period(self, index: usize) -> Result<VisaPeriod, StoreError> {
        let id = VisaId::new(self.id.as_str()).map_err(|err| StoreError::Record {
            file: VISA_PERIODS_FILE,
            index,
            message: err.to_string(),
        })?;
        let start_date = parse_date(&self.start_date).map_err(|_| StoreError::InvalidDate {
            file: VISA_PERIODS_FILE,
            owner: format!("visa period {}", self.id),
            field: "start_date",
            value: self.start_date.clone(),
        })?;
        let end_date = parse_date(&self.end_date).map_err(|_| StoreError::InvalidDate {
            file: VISA_PERIODS_FILE,
            owner: format!("visa period {}", self.id),
            field: "end_date",
            value: self.end_date.clone(),
        })?;
        Ok(VisaPeriod {
            id,
            label: self.label,
            start_date,
            end_date,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

fn read_file(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(StoreError::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}
