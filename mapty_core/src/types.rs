//! Core domain types for the Mapty workout log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Coordinates and activity kinds
//! - The workout entity and its variant-specific details
//! - Raw and validated form input
//! - Display payloads handed to rendering collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Location
// ============================================================================

/// A latitude/longitude pair in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

// ============================================================================
// Activity Kinds
// ============================================================================

/// Type of logged activity; also the persisted discriminator tag
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Lowercase tag, as stored and as accepted from the form
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }

    /// Style class for the marker popup
    pub fn popup_class(&self) -> String {
        format!("{}-popup", self.as_str())
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(crate::Error::Validation(format!(
                "Unknown activity type: {:?}",
                other
            ))),
        }
    }
}

// ============================================================================
// Workout Entity
// ============================================================================

/// Variant-specific raw input, before any metric is derived
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Activity {
    Running { cadence_spm: u32 },
    Cycling { elevation_gain_m: f64 },
}

impl Activity {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Activity::Running { .. } => WorkoutKind::Running,
            Activity::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Variant-specific fields together with the metric derived at construction
#[derive(Clone, Debug, PartialEq)]
pub enum WorkoutDetails {
    Running {
        cadence_spm: u32,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_kmh: f64,
    },
}

/// One logged activity session.
///
/// Only obtainable through the constructors in `workout.rs`, so every value
/// in circulation has passed validation and carries its derived fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Workout {
    pub(crate) id: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) coordinates: Coordinates,
    pub(crate) distance_km: f64,
    pub(crate) duration_min: f64,
    pub(crate) description: String,
    pub(crate) details: WorkoutDetails,
}

// ============================================================================
// Form Input
// ============================================================================

/// Raw field values as read from the input form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInput {
    pub activity_type: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Form input that passed validation and is ready to become a workout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkoutDraft {
    pub distance_km: f64,
    pub duration_min: f64,
    pub activity: Activity,
}

// ============================================================================
// Display Payloads
// ============================================================================

/// A formatted value with its unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Measure {
    pub value: String,
    pub unit: &'static str,
}

/// Display fields for one entry in the workout list
#[derive(Clone, Debug, PartialEq)]
pub struct EntryView {
    pub id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub icon: &'static str,
    pub distance: Measure,
    pub duration: Measure,
    /// Pace or speed
    pub metric: Measure,
    /// Cadence or elevation gain
    pub detail: Measure,
}
