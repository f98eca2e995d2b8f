//! Serialization of the workout store to a single JSON blob.
//!
//! The blob is a JSON array with one object per workout, tagged by `kind`.
//! Only raw fields are written. Decoding rebuilds each entry through
//! [`Workout::restore`], so pace, speed and description come out exactly as a
//! live construction would produce them.

use crate::{Activity, Coordinates, Error, Result, Workout, WorkoutStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk record format for one workout
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StoredWorkout {
    Running {
        id: String,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
    },
    Cycling {
        id: String,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

impl From<&Workout> for StoredWorkout {
    fn from(workout: &Workout) -> Self {
        let id = workout.id().to_string();
        let created_at = workout.created_at();
        let coordinates = workout.coordinates();
        let distance_km = workout.distance_km();
        let duration_min = workout.duration_min();

        match workout.activity() {
            Activity::Running { cadence_spm } => StoredWorkout::Running {
                id,
                created_at,
                coordinates,
                distance_km,
                duration_min,
                cadence_spm,
            },
            Activity::Cycling { elevation_gain_m } => StoredWorkout::Cycling {
                id,
                created_at,
                coordinates,
                distance_km,
                duration_min,
                elevation_gain_m,
            },
        }
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = Error;

    fn try_from(record: StoredWorkout) -> Result<Self> {
        match record {
            StoredWorkout::Running {
                id,
                created_at,
                coordinates,
                distance_km,
                duration_min,
                cadence_spm,
            } => Workout::restore(
                id,
                created_at,
                coordinates,
                distance_km,
                duration_min,
                Activity::Running { cadence_spm },
            ),
            StoredWorkout::Cycling {
                id,
                created_at,
                coordinates,
                distance_km,
                duration_min,
                elevation_gain_m,
            } => Workout::restore(
                id,
                created_at,
                coordinates,
                distance_km,
                duration_min,
                Activity::Cycling { elevation_gain_m },
            ),
        }
    }
}

/// Serialize every workout in the store, in display order
pub fn encode(store: &WorkoutStore) -> Result<String> {
    let records: Vec<StoredWorkout> = store.all().map(StoredWorkout::from).collect();
    // Compact JSON; output is deterministic for a given store
    let blob = serde_json::to_string(&records)?;
    tracing::debug!("Encoded {} workouts ({} bytes)", records.len(), blob.len());
    Ok(blob)
}

/// Rebuild a store from an encoded blob.
///
/// Any bad entry fails the whole decode with [`Error::CorruptData`]; no
/// partial store is ever returned.
pub fn decode(blob: &str) -> Result<WorkoutStore> {
    let records: Vec<StoredWorkout> = serde_json::from_str(blob)
        .map_err(|e| Error::CorruptData(format!("unreadable workout blob: {}", e)))?;

    let mut workouts = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let workout = Workout::try_from(record)
            .map_err(|e| Error::CorruptData(format!("entry {}: {}", idx, e)))?;
        workouts.push(workout);
    }

    let store = WorkoutStore::from_workouts(workouts)
        .map_err(|e| Error::CorruptData(e.to_string()))?;
    tracing::debug!("Decoded {} workouts", store.len());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkoutKind;

    fn sample_store() -> WorkoutStore {
        WorkoutStore::from_workouts(vec![
            Workout::running(Coordinates::new(40.7, -74.0), 5.0, 30.0, 150).unwrap(),
            Workout::cycling(Coordinates::new(40.7, -74.0), 20.0, 60.0, 200.0).unwrap(),
            Workout::running(Coordinates::new(48.85, 2.35), 10.3, 52.7, 172).unwrap(),
            Workout::cycling(Coordinates::new(-33.9, 151.2), 7.25, 19.0, -14.5).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_entities() {
        let store = sample_store();
        let decoded = decode(&encode(&store).unwrap()).unwrap();

        assert_eq!(decoded.len(), store.len());
        for (original, restored) in store.all().zip(decoded.all()) {
            assert_eq!(original.id(), restored.id());
            assert_eq!(original.kind(), restored.kind());
            assert_eq!(original.pace_min_per_km(), restored.pace_min_per_km());
            assert_eq!(original.speed_kmh(), restored.speed_kmh());
            assert_eq!(original.description(), restored.description());
            assert_eq!(original, restored);
        }
    }

    #[test]
    fn test_restored_store_supports_lookup() {
        let store = sample_store();
        let decoded = decode(&encode(&store).unwrap()).unwrap();

        for workout in store.all() {
            assert!(decoded.find_by_id(workout.id()).is_ok());
        }
    }

    #[test]
    fn test_encode_is_idempotent() {
        let store = sample_store();
        let first = encode(&store).unwrap();
        let second = encode(&store).unwrap();
        assert_eq!(first, second);

        let reencoded = encode(&decode(&first).unwrap()).unwrap();
        assert_eq!(first, reencoded);
    }

    #[test]
    fn test_encoded_format_has_kind_tag() {
        let store = sample_store();
        let value: serde_json::Value = serde_json::from_str(&encode(&store).unwrap()).unwrap();
        let entries = value.as_array().unwrap();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["kind"], "running");
        assert_eq!(entries[0]["cadence_spm"], 150);
        assert_eq!(entries[0]["coordinates"][0], 40.7);
        assert_eq!(entries[1]["kind"], "cycling");
        assert_eq!(entries[1]["elevation_gain_m"], 200.0);
        assert!(entries[1].get("speed_kmh").is_none());
    }

    #[test]
    fn test_empty_store() {
        let encoded = encode(&WorkoutStore::new()).unwrap();
        assert_eq!(encoded, "[]");
        assert!(decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_decode_hand_written_blob() {
        let blob = r#"[{"kind":"cycling","id":"1712914200000","created_at":"2024-04-12T09:30:00Z","coordinates":[40.7,-74.0],"distance_km":20,"duration_min":60,"elevation_gain_m":200}]"#;
        let store = decode(blob).unwrap();
        let workout = store.find_by_id("1712914200000").unwrap();

        assert_eq!(workout.kind(), WorkoutKind::Cycling);
        assert_eq!(workout.speed_kmh(), Some(20.0));
        assert_eq!(workout.description(), "Cycling on April, 12");
    }

    #[test]
    fn test_missing_kind_is_corrupt() {
        let blob = r#"[{"id":"1","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30,"cadence_spm":150}]"#;
        assert!(matches!(decode(blob), Err(Error::CorruptData(_))));
    }

    #[test]
    fn test_unknown_kind_is_corrupt() {
        let blob = r#"[{"kind":"swimming","id":"1","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30}]"#;
        assert!(matches!(decode(blob), Err(Error::CorruptData(_))));
    }

    #[test]
    fn test_max_id_is_corrupt_and_ids_keep_working() {
        let blob = r#"[{"kind":"running","id":"18446744073709551615","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30,"cadence_spm":150}]"#;
        assert!(matches!(decode(blob), Err(Error::CorruptData(_))));

        let fresh = Workout::running(Coordinates::new(1.0, 2.0), 5.0, 30.0, 150).unwrap();
        assert!(fresh.id().parse::<u64>().is_ok());
    }

    #[test]
    fn test_truncated_blob_is_corrupt() {
        let encoded = encode(&sample_store()).unwrap();
        let truncated = &encoded[..encoded.len() / 2];
        assert!(matches!(decode(truncated), Err(Error::CorruptData(_))));
    }

    #[test]
    fn test_missing_field_is_corrupt() {
        let blob = r#"[{"kind":"running","id":"1","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30}]"#;
        assert!(matches!(decode(blob), Err(Error::CorruptData(_))));
    }

    #[test]
    fn test_invalid_entry_fails_whole_decode() {
        let blob = r#"[
            {"kind":"running","id":"1","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30,"cadence_spm":150},
            {"kind":"running","id":"2","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":0,"duration_min":30,"cadence_spm":150}
        ]"#;
        assert!(matches!(decode(blob), Err(Error::CorruptData(msg)) if msg.contains("entry 1")));
    }

    #[test]
    fn test_non_finite_number_is_corrupt() {
        let blob = r#"[{"kind":"cycling","id":"1","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30,"elevation_gain_m":null}]"#;
        assert!(matches!(decode(blob), Err(Error::CorruptData(_))));
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let entry = r#"{"kind":"running","id":"7","created_at":"2024-04-12T09:30:00Z","coordinates":[1.0,2.0],"distance_km":5,"duration_min":30,"cadence_spm":150}"#;
        let blob = format!("[{},{}]", entry, entry);
        assert!(matches!(decode(&blob), Err(Error::CorruptData(_))));
    }
}
