//! Trip records and the date-to-trip classifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityError;
use crate::span::{self, DateSpan};
use crate::types::TripId;

/// Trips of this many days or more never count toward ILR.
pub const LONG_TRIP_MIN_DAYS: i64 = 14;

/// A single trip abroad with inclusive travel dates.
///
/// Plain record; date ordering and overlap are enforced when the
/// [`TripClassifier`] is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub from_airport: String,
    pub to_airport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Trip {
    /// Inclusive trip length: departure and return day both count.
    pub fn length_days(&self) -> i64 {
        (self.return_date - self.departure_date).num_days() + 1
    }

    /// Short trips stay ILR-qualifying; the boundary is inclusive on the
    /// long side, so exactly 14 days is long.
    pub fn is_short(&self) -> bool {
        self.length_days() < LONG_TRIP_MIN_DAYS
    }
}

impl DateSpan for Trip {
    fn span_start(&self) -> NaiveDate {
        self.departure_date
    }

    fn span_end(&self) -> NaiveDate {
        self.return_date
    }
}

/// Resolves which trip, if any, covers a given date.
///
/// Construction sorts the trips by departure date and validates the whole
/// set; any inverted or overlapping trip is a fatal data-integrity error
/// rather than a condition to resolve silently. Lookup is a binary search
/// over the sorted, non-overlapping spans.
#[derive(Debug, Clone)]
pub struct TripClassifier {
    trips: Vec<Trip>,
}

impl TripClassifier {
    pub fn new(mut trips: Vec<Trip>) -> Result<Self, DataIntegrityError> {
        for trip in &trips {
            if trip.return_date < trip.departure_date {
                return Err(DataIntegrityError::TripDatesInverted {
                    id: trip.id.clone(),
                    departure_date: trip.departure_date,
                    return_date: trip.return_date,
                });
            }
        }

        trips.sort_by(|a, b| {
            (a.departure_date, &a.id).cmp(&(b.departure_date, &b.id))
        });

        if let Some((first, second)) = span::find_overlap(&trips) {
            // With the trips sorted, the later departure is the first shared date.
            return Err(DataIntegrityError::OverlappingTrips {
                date: second.departure_date,
                first: first.id.clone(),
                second: second.id.clone(),
            });
        }

        tracing::debug!(trips = trips.len(), "trip classifier built");
        Ok(Self { trips })
    }

    /// Returns the trip covering `date`, if any. O(log n).
    pub fn classify(&self, date: NaiveDate) -> Option<&Trip> {
        span::span_covering(&self.trips, date)
    }

    /// All trips, ordered by departure date.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Looks up a trip by id.
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.iter().find(|trip| &trip.id == id)
    }

    /// Trips sharing at least one date with `[start, end]`, in order.
    pub fn trips_in_range(&self, start: NaiveDate, end: NaiveDate) -> &[Trip] {
        span::spans_overlapping_range(&self.trips, start, end)
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn trip(id: &str, departure: (i32, u32, u32), ret: (i32, u32, u32)) -> Trip {
        Trip {
            id: TripId::new(id).unwrap(),
            departure_date: d(departure.0, departure.1, departure.2),
            return_date: d(ret.0, ret.1, ret.2),
            from_airport: "LHR".to_string(),
            to_airport: "WAW".to_string(),
            notes: None,
        }
    }

    // ========== Trip Length Tests ==========

    #[test]
    fn length_counts_both_travel_days() {
        assert_eq!(trip("t", (2024, 6, 1), (2024, 6, 1)).length_days(), 1);
        assert_eq!(trip("t", (2024, 6, 1), (2024, 6, 10)).length_days(), 10);
    }

    #[test]
    fn thirteen_days_is_short_fourteen_is_long() {
        let thirteen = trip("t", (2024, 6, 1), (2024, 6, 13));
        assert_eq!(thirteen.length_days(), 13);
        assert!(thirteen.is_short());

        let fourteen = trip("t", (2024, 6, 1), (2024, 6, 14));
        assert_eq!(fourteen.length_days(), 14);
        assert!(!fourteen.is_short());
    }

    // ========== Classifier Construction Tests ==========

    #[test]
    fn rejects_inverted_trip_dates() {
        let result = TripClassifier::new(vec![trip("bad", (2024, 6, 10), (2024, 6, 1))]);
        assert_eq!(
            result.unwrap_err(),
            DataIntegrityError::TripDatesInverted {
                id: TripId::new("bad").unwrap(),
                departure_date: d(2024, 6, 10),
                return_date: d(2024, 6, 1),
            }
        );
    }

    #[test]
    fn rejects_overlapping_trips_naming_both() {
        let result = TripClassifier::new(vec![
            trip("summer", (2024, 6, 1), (2024, 6, 10)),
            trip("wedding", (2024, 6, 10), (2024, 6, 12)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DataIntegrityError::OverlappingTrips {
                date: d(2024, 6, 10),
                first: TripId::new("summer").unwrap(),
                second: TripId::new("wedding").unwrap(),
            }
        );
    }

    #[test]
    fn detects_overlap_regardless_of_input_order() {
        let result = TripClassifier::new(vec![
            trip("late", (2024, 8, 1), (2024, 8, 20)),
            trip("early", (2024, 7, 25), (2024, 8, 3)),
        ]);
        assert!(matches!(
            result,
            Err(DataIntegrityError::OverlappingTrips { .. })
        ));
    }

    #[test]
    fn accepts_back_to_back_trips() {
        let classifier = TripClassifier::new(vec![
            trip("first", (2024, 6, 1), (2024, 6, 10)),
            trip("second", (2024, 6, 11), (2024, 6, 20)),
        ])
        .unwrap();
        assert_eq!(classifier.len(), 2);
    }

    // ========== Lookup Tests ==========

    fn classifier() -> TripClassifier {
        TripClassifier::new(vec![
            trip("autumn", (2024, 10, 1), (2024, 10, 20)),
            trip("spring", (2024, 3, 5), (2024, 3, 9)),
            trip("summer", (2024, 6, 1), (2024, 6, 13)),
        ])
        .unwrap()
    }

    #[test]
    fn classify_finds_covering_trip() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify(d(2024, 3, 7)).map(|t| t.id.as_str()),
            Some("spring")
        );
        assert_eq!(
            classifier.classify(d(2024, 10, 20)).map(|t| t.id.as_str()),
            Some("autumn")
        );
        assert!(classifier.classify(d(2024, 4, 1)).is_none());
        assert!(classifier.classify(d(2024, 1, 1)).is_none());
        assert!(classifier.classify(d(2024, 12, 31)).is_none());
    }

    #[test]
    fn classify_covers_departure_and_return_days() {
        let classifier = classifier();
        assert!(classifier.classify(d(2024, 6, 1)).is_some());
        assert!(classifier.classify(d(2024, 6, 13)).is_some());
        assert!(classifier.classify(d(2024, 5, 31)).is_none());
        assert!(classifier.classify(d(2024, 6, 14)).is_none());
    }

    #[test]
    fn trips_are_sorted_by_departure() {
        let classifier = classifier();
        let ids: Vec<_> = classifier.trips().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["spring", "summer", "autumn"]);
    }

    #[test]
    fn trips_in_range_returns_overlapping_trips() {
        let classifier = classifier();
        let hits = classifier.trips_in_range(d(2024, 6, 10), d(2024, 10, 1));
        let ids: Vec<_> = hits.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["summer", "autumn"]);
    }

    #[test]
    fn empty_classifier_classifies_nothing() {
        let classifier = TripClassifier::new(vec![]).unwrap();
        assert!(classifier.is_empty());
        assert!(classifier.classify(d(2024, 6, 1)).is_none());
    }

    #[test]
    fn trip_lookup_by_id() {
        let classifier = classifier();
        let id = TripId::new("summer").unwrap();
        assert_eq!(
            classifier.trip(&id).map(|t| t.departure_date),
            Some(d(2024, 6, 1))
        );
        assert!(classifier.trip(&TripId::new("winter").unwrap()).is_none());
    }
}
