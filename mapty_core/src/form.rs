//! Parsing and validation of raw form input.
//!
//! All numeric fields must parse to finite numbers. Everything except the
//! elevation gain must also be strictly positive. Only the field belonging to
//! the selected activity type is read; the other one is ignored.

use crate::{Activity, Error, FormInput, Result, WorkoutDraft, WorkoutKind};

fn parse_number(name: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} is required", name)));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| Error::Validation(format!("{} must be a number, got {:?}", name, trimmed)))?;
    if !value.is_finite() {
        return Err(Error::Validation(format!("{} must be a finite number", name)));
    }
    Ok(value)
}

fn parse_positive(name: &str, raw: &str) -> Result<f64> {
    let value = parse_number(name, raw)?;
    if value <= 0.0 {
        return Err(Error::Validation(format!(
            "{} must be a positive number",
            name
        )));
    }
    Ok(value)
}

fn parse_cadence(raw: &str) -> Result<u32> {
    let value = parse_positive("cadence", raw)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(Error::Validation(
            "cadence must be a whole number of steps per minute".into(),
        ));
    }
    Ok(value as u32)
}

impl FormInput {
    /// Validate the raw fields into a draft workout
    pub fn parse(&self) -> Result<WorkoutDraft> {
        if self.activity_type.trim().is_empty() {
            return Err(Error::Validation("activity type is required".into()));
        }
        let kind: WorkoutKind = self.activity_type.parse()?;
        let distance_km = parse_positive("distance", &self.distance)?;
        let duration_min = parse_positive("duration", &self.duration)?;

        let activity = match kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: parse_cadence(&self.cadence)?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: parse_number("elevation gain", &self.elevation)?,
            },
        };

        Ok(WorkoutDraft {
            distance_km,
            duration_min,
            activity,
        })
    }
}
