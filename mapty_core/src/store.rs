//! In-memory workout collection.
//!
//! Insertion order is display order. A side index keyed by workout id keeps
//! lookups O(1); every mutation keeps it in step with the backing vector.

use crate::{Error, Result, Workout};
use std::collections::HashMap;

/// Ordered collection of workouts with lookup by id
#[derive(Clone, Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    index: HashMap<String, usize>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from workouts in display order
    pub fn from_workouts(workouts: Vec<Workout>) -> Result<Self> {
        let mut store = Self::new();
        store.replace_all(workouts)?;
        Ok(store)
    }

    /// Add a workout at the end of the collection
    pub fn append(&mut self, workout: Workout) -> Result<()> {
        if self.index.contains_key(workout.id()) {
            return Err(Error::DuplicateId(workout.id().to_string()));
        }
        self.index
            .insert(workout.id().to_string(), self.workouts.len());
        tracing::debug!("Appended workout {} to store", workout.id());
        self.workouts.push(workout);
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Result<&Workout> {
        self.index
            .get(id)
            .map(|&idx| &self.workouts[idx])
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Iterate workouts in insertion order
    pub fn all(&self) -> impl Iterator<Item = &Workout> + '_ {
        self.workouts.iter()
    }

    /// Swap in a new set of workouts, rebuilding the index.
    ///
    /// On error the store keeps its previous contents.
    pub fn replace_all(&mut self, workouts: Vec<Workout>) -> Result<()> {
        let mut index = HashMap::with_capacity(workouts.len());
        for (idx, workout) in workouts.iter().enumerate() {
            if index.insert(workout.id().to_string(), idx).is_some() {
                return Err(Error::DuplicateId(workout.id().to_string()));
            }
        }
        self.workouts = workouts;
        self.index = index;
        tracing::debug!("Replaced store contents with {} workouts", self.workouts.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.workouts.iter()
    }
}
