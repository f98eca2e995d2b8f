//! Workout construction and derived metrics.
//!
//! Every workout passes through [`Workout::restore`]'s validation path, whether
//! it is built live from form input or reconstructed from storage. Pace, speed
//! and description are computed there once and stored on the entity.

use crate::{
    Activity, Coordinates, EntryView, Error, Measure, Result, Workout, WorkoutDetails, WorkoutKind,
};
use chrono::{DateTime, Datelike, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Highest numeric id handed out (or seen on restore) in this process
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Largest numeric id accepted on restore: 9999-12-31T23:59:59.999Z in milliseconds
const MAX_NUMERIC_ID: u64 = 253_402_300_799_999;

/// Issue an id from the creation time in milliseconds.
///
/// Ids are strictly increasing within the process: a second call in the same
/// millisecond gets the next integer instead of a repeat.
fn next_id(created_at: DateTime<Utc>) -> Result<String> {
    let millis = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let bumped = last
            .checked_add(1)
            .ok_or_else(|| Error::Validation("workout id space exhausted".into()))?;
        let candidate = millis.max(bumped);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return Ok(candidate.to_string()),
            Err(actual) => last = actual,
        }
    }
}

/// Keep fresh ids above any numeric id restored from storage
fn reserve_id(id: &str) {
    if let Ok(n) = id.parse::<u64>() {
        LAST_ID.fetch_max(n, Ordering::Relaxed);
    }
}

fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!(
        "{} on {}, {}",
        kind.label(),
        MONTHS[created_at.month0() as usize],
        created_at.day()
    )
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::Validation(format!("{} must be a finite number", name)));
    }
    if value <= 0.0 {
        return Err(Error::Validation(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(())
}

impl Workout {
    /// Build a new workout stamped with the current time and a fresh id
    pub fn new(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
    ) -> Result<Self> {
        let created_at = Utc::now();
        // Validate before consuming an id
        Self::build(
            String::new(),
            created_at,
            coordinates,
            distance_km,
            duration_min,
            activity,
        )
        .and_then(|mut workout| {
            workout.id = next_id(created_at)?;
            Ok(workout)
        })
    }

    pub fn running(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
    ) -> Result<Self> {
        Self::new(
            coordinates,
            distance_km,
            duration_min,
            Activity::Running { cadence_spm },
        )
    }

    pub fn cycling(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self> {
        Self::new(
            coordinates,
            distance_km,
            duration_min,
            Activity::Cycling { elevation_gain_m },
        )
    }

    /// Rebuild a previously persisted workout, keeping its original id and
    /// timestamp and re-deriving everything else through the same path as
    /// [`Workout::new`].
    pub fn restore(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::Validation("workout id must not be empty".into()));
        }
        if matches!(id.parse::<u64>(), Ok(n) if n > MAX_NUMERIC_ID) {
            return Err(Error::Validation(format!("workout id {} is out of range", id)));
        }
        let workout = Self::build(
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            activity,
        )?;
        reserve_id(&workout.id);
        Ok(workout)
    }

    fn build(
        id: String,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
    ) -> Result<Self> {
        if !coordinates.is_finite() {
            return Err(Error::Validation(format!(
                "coordinates must be finite, got {:?}",
                coordinates
            )));
        }
        require_positive("distance", distance_km)?;
        require_positive("duration", duration_min)?;

        let details = match activity {
            Activity::Running { cadence_spm } => {
                if cadence_spm == 0 {
                    return Err(Error::Validation(
                        "cadence must be a positive number".into(),
                    ));
                }
                WorkoutDetails::Running {
                    cadence_spm,
                    pace_min_per_km: duration_min / distance_km,
                }
            }
            Activity::Cycling { elevation_gain_m } => {
                if !elevation_gain_m.is_finite() {
                    return Err(Error::Validation(
                        "elevation gain must be a finite number".into(),
                    ));
                }
                WorkoutDetails::Cycling {
                    elevation_gain_m,
                    speed_kmh: distance_km / (duration_min / 60.0),
                }
            }
        };

        Ok(Workout {
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            description: describe(activity.kind(), created_at),
            details,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    /// e.g. "Running on April, 12"
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.details {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// The raw variant input this workout was built from
    pub fn activity(&self) -> Activity {
        match self.details {
            WorkoutDetails::Running { cadence_spm, .. } => Activity::Running { cadence_spm },
            WorkoutDetails::Cycling {
                elevation_gain_m, ..
            } => Activity::Cycling { elevation_gain_m },
        }
    }

    /// Minutes per kilometre, for running workouts
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    /// Kilometres per hour, for cycling workouts
    pub fn speed_kmh(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed_kmh, .. } => Some(speed_kmh),
            WorkoutDetails::Running { .. } => None,
        }
    }

    /// Popup text for the map marker
    pub fn marker_label(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// Fields shown for this workout in the list
    pub fn entry_view(&self) -> EntryView {
        let (metric, detail) = match self.details {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => (
                Measure {
                    value: format!("{:.1}", pace_min_per_km),
                    unit: "min/km",
                },
                Measure {
                    value: cadence_spm.to_string(),
                    unit: "spm",
                },
            ),
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_kmh,
            } => (
                Measure {
                    value: format!("{:.1}", speed_kmh),
                    unit: "km/h",
                },
                Measure {
                    value: elevation_gain_m.to_string(),
                    unit: "m",
                },
            ),
        };

        EntryView {
            id: self.id.clone(),
            kind: self.kind(),
            title: self.description.clone(),
            icon: self.kind().icon(),
            distance: Measure {
                value: self.distance_km.to_string(),
                unit: "km",
            },
            duration: Measure {
                value: self.duration_min.to_string(),
                unit: "min",
            },
            metric,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nyc() -> Coordinates {
        Coordinates::new(40.7, -74.0)
    }

    #[test]
    fn test_running_pace() {
        let workout = Workout::running(nyc(), 5.0, 30.0, 150).unwrap();

        assert_eq!(workout.kind(), WorkoutKind::Running);
        assert!((workout.pace_min_per_km().unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(workout.speed_kmh(), None);
        assert!(workout.description().contains("Running"));
    }

    #[test]
    fn test_cycling_speed() {
        let workout = Workout::cycling(nyc(), 20.0, 60.0, 200.0).unwrap();

        assert_eq!(workout.kind(), WorkoutKind::Cycling);
        assert!((workout.speed_kmh().unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(workout.pace_min_per_km(), None);
        assert!(workout.description().starts_with("Cycling on "));
    }

    #[test]
    fn test_metric_matches_formula_across_inputs() {
        for (distance, duration) in [(0.4, 3.0), (12.5, 71.0), (42.195, 215.5), (3.0, 0.5)] {
            let run = Workout::running(nyc(), distance, duration, 170).unwrap();
            let ride = Workout::cycling(nyc(), distance, duration, 0.0).unwrap();

            assert!((run.pace_min_per_km().unwrap() - duration / distance).abs() < 1e-9);
            assert!((ride.speed_kmh().unwrap() - distance / (duration / 60.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_non_positive_base_fields() {
        assert!(matches!(
            Workout::running(nyc(), 0.0, 30.0, 150),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Workout::cycling(nyc(), 10.0, -5.0, 100.0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Workout::cycling(nyc(), f64::NAN, 10.0, 100.0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_bad_variant_fields() {
        assert!(matches!(
            Workout::running(nyc(), 5.0, 30.0, 0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Workout::cycling(nyc(), 5.0, 30.0, f64::INFINITY),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Workout::running(Coordinates::new(f64::NAN, 1.0), 5.0, 30.0, 150),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_negative_elevation_allowed() {
        let workout = Workout::cycling(nyc(), 15.0, 45.0, -120.0).unwrap();
        assert_eq!(
            workout.activity(),
            Activity::Cycling {
                elevation_gain_m: -120.0
            }
        );
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let ids: Vec<String> = (0..200)
            .map(|_| Workout::running(nyc(), 5.0, 30.0, 150).unwrap().id)
            .collect();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.iter().all(|id| id.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_description_format() {
        let at = Utc.with_ymd_and_hms(2024, 4, 12, 9, 30, 0).unwrap();
        let workout =
            Workout::restore("1712914200000", at, nyc(), 5.0, 30.0, Activity::Running {
                cadence_spm: 150,
            })
            .unwrap();
        assert_eq!(workout.description(), "Running on April, 12");
        assert_eq!(workout.marker_label(), "🏃‍♂️ Running on April, 12");
    }

    #[test]
    fn test_restore_matches_live_construction() {
        let live = Workout::cycling(nyc(), 20.0, 60.0, 200.0).unwrap();
        let restored = Workout::restore(
            live.id(),
            live.created_at(),
            live.coordinates(),
            live.distance_km(),
            live.duration_min(),
            live.activity(),
        )
        .unwrap();
        assert_eq!(live, restored);
    }

    #[test]
    fn test_restore_reserves_id() {
        let far_future = "99999999999999";
        let at = Utc::now();
        Workout::restore(far_future, at, nyc(), 1.0, 1.0, Activity::Cycling {
            elevation_gain_m: 0.0,
        })
        .unwrap();

        let fresh = Workout::running(nyc(), 5.0, 30.0, 150).unwrap();
        assert!(fresh.id().parse::<u64>().unwrap() > far_future.parse::<u64>().unwrap());
    }

    #[test]
    fn test_restore_rejects_out_of_range_id() {
        let result = Workout::restore(
            u64::MAX.to_string(),
            Utc::now(),
            nyc(),
            1.0,
            1.0,
            Activity::Running { cadence_spm: 90 },
        );
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(Workout::running(nyc(), 5.0, 30.0, 150).is_ok());
    }

    #[test]
    fn test_restore_rejects_empty_id() {
        let result = Workout::restore("", Utc::now(), nyc(), 1.0, 1.0, Activity::Running {
            cadence_spm: 90,
        });
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_entry_view_fields() {
        let run = Workout::running(nyc(), 5.0, 30.0, 150).unwrap();
        let view = run.entry_view();
        assert_eq!(view.id, run.id());
        assert_eq!(view.metric.value, "6.0");
        assert_eq!(view.metric.unit, "min/km");
        assert_eq!(view.detail.value, "150");
        assert_eq!(view.distance.value, "5");

        let ride = Workout::cycling(nyc(), 20.0, 60.0, 200.0).unwrap();
        let view = ride.entry_view();
        assert_eq!(view.metric.value, "20.0");
        assert_eq!(view.metric.unit, "km/h");
        assert_eq!(view.detail.value, "200");
        assert_eq!(view.detail.unit, "m");
    }
}
