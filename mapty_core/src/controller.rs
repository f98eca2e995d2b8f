//! Application state manager.
//!
//! The controller owns the workout store and the form state machine, turns
//! collaborator events into workouts, and persists the whole store after
//! every mutation:
//!
//! - `Idle` (form hidden) → map click → `AwaitingInput` (form shown)
//! - `AwaitingInput` → valid submit → `Idle`
//! - `AwaitingInput` → invalid submit → `AwaitingInput` (user notified)
//! - `AwaitingInput` → map click → `AwaitingInput` with the new coordinate
//!
//! Markers are only placed once the map view reports ready. Workouts restored
//! at startup are rendered in the list immediately and get their markers when
//! the map becomes ready.

use crate::blob::BlobStore;
use crate::collaborators::{InputSource, MapView, Notifier, RenderSink};
use crate::{codec, Config, Coordinates, Error, Result, Workout, WorkoutKind, WorkoutStore};

/// Message shown when no starting position can be acquired
pub const GEOLOCATION_FAILED_MESSAGE: &str = "Could not get your location!";

/// Visibility of the entry form
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormState {
    /// Form hidden
    Idle,
    /// Form shown for a clicked map position
    AwaitingInput { pending: Coordinates },
}

/// Lifecycle of the map view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapState {
    /// No starting position yet
    Uninitialized,
    /// Centered, waiting for the ready signal
    Centered,
    /// Accepting marker placements
    Ready,
}

/// Settings the controller takes from configuration
#[derive(Clone, Debug)]
pub struct ControllerSettings {
    pub storage_key: String,
    pub zoom_level: u8,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            storage_key: config.storage.key.clone(),
            zoom_level: config.map.zoom_level,
        }
    }
}

/// Orchestrates workout creation, rendering and persistence
pub struct WorkoutController<M, I, R, N, B> {
    map: M,
    input: I,
    list: R,
    notifier: N,
    blobs: B,
    settings: ControllerSettings,
    store: WorkoutStore,
    form: FormState,
    map_state: MapState,
}

impl<M, I, R, N, B> WorkoutController<M, I, R, N, B>
where
    M: MapView,
    I: InputSource,
    R: RenderSink,
    N: Notifier,
    B: BlobStore,
{
    pub fn new(
        map: M,
        input: I,
        list: R,
        notifier: N,
        blobs: B,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            map,
            input,
            list,
            notifier,
            blobs,
            settings,
            store: WorkoutStore::new(),
            form: FormState::Idle,
            map_state: MapState::Uninitialized,
        }
    }

    /// Restore persisted workouts and render them in the list.
    ///
    /// A missing, unreadable or corrupt blob leaves the store empty. Returns
    /// the number of restored workouts.
    pub fn start(&mut self) -> usize {
        let restored = match self.load_persisted() {
            Ok(Some(store)) => store,
            Ok(None) => {
                tracing::info!("No saved workouts, starting empty");
                WorkoutStore::new()
            }
            Err(e) => {
                tracing::warn!("Discarding saved workouts: {}. Starting empty.", e);
                WorkoutStore::new()
            }
        };
        self.store = restored;

        for workout in self.store.all() {
            self.list.render_entry(&workout.entry_view());
        }

        tracing::info!("Restored {} workouts", self.store.len());
        self.store.len()
    }

    fn load_persisted(&self) -> Result<Option<WorkoutStore>> {
        match self.blobs.get(&self.settings.storage_key)? {
            Some(blob) => codec::decode(&blob).map(Some),
            None => Ok(None),
        }
    }

    /// Result of the one-shot starting position request
    pub fn handle_geolocation(&mut self, position: Result<Coordinates>) {
        match position {
            Ok(coordinates) if coordinates.is_finite() => {
                tracing::info!("Centering map on {}", coordinates);
                self.map.set_center(coordinates, self.settings.zoom_level);
                if self.map_state == MapState::Uninitialized {
                    self.map_state = MapState::Centered;
                }
            }
            Ok(coordinates) => {
                tracing::warn!("Ignoring non-finite starting position {:?}", coordinates);
                self.notifier.notify(GEOLOCATION_FAILED_MESSAGE);
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.notifier.notify(GEOLOCATION_FAILED_MESSAGE);
            }
        }
    }

    /// The map view finished initializing; place every deferred marker
    pub fn handle_map_ready(&mut self) {
        match self.map_state {
            MapState::Uninitialized => {
                tracing::warn!("Map reported ready before it was centered, ignoring");
            }
            MapState::Ready => {
                tracing::debug!("Map already ready, ignoring repeated signal");
            }
            MapState::Centered => {
                self.map_state = MapState::Ready;
                for workout in self.store.all() {
                    self.map.place_marker(
                        workout.coordinates(),
                        workout.kind(),
                        &workout.marker_label(),
                    );
                }
                tracing::info!("Map ready, placed {} markers", self.store.len());
            }
        }
    }

    /// A position on the map was clicked; open the form for it
    pub fn handle_map_click(&mut self, coordinates: Coordinates) {
        if !coordinates.is_finite() {
            tracing::warn!("Ignoring click at non-finite position {:?}", coordinates);
            return;
        }

        match self.form {
            FormState::Idle => self.input.show(),
            FormState::AwaitingInput { .. } => {
                tracing::debug!("Replacing pending position with {}", coordinates);
            }
        }
        self.form = FormState::AwaitingInput {
            pending: coordinates,
        };
    }

    /// The activity type selector changed
    pub fn handle_type_changed(&mut self, kind: WorkoutKind) {
        self.input.show_field_for(kind);
    }

    /// The form was submitted.
    ///
    /// On success returns the new workout's id. A validation error has
    /// already been reported to the user and leaves all state unchanged.
    pub fn handle_submit(&mut self) -> Result<String> {
        let workout = match self.build_from_form() {
            Ok(workout) => workout,
            Err(e) => {
                tracing::info!("Rejected workout input: {}", e);
                self.notifier.notify(&e.to_string());
                return Err(e);
            }
        };
        let id = workout.id().to_string();

        self.store.append(workout)?;
        let workout = self.store.find_by_id(&id)?;

        if self.map_state == MapState::Ready {
            self.map.place_marker(
                workout.coordinates(),
                workout.kind(),
                &workout.marker_label(),
            );
        }
        self.list.render_entry(&workout.entry_view());

        self.input.clear_and_hide();
        self.form = FormState::Idle;

        tracing::info!("Logged workout {} ({})", id, workout.description());
        self.persist()?;
        Ok(id)
    }

    fn build_from_form(&self) -> Result<Workout> {
        let pending = match self.form {
            FormState::AwaitingInput { pending } => pending,
            FormState::Idle => {
                return Err(Error::Validation(
                    "Select a location on the map first".into(),
                ))
            }
        };
        let draft = self.input.read().parse()?;
        Workout::new(
            pending,
            draft.distance_km,
            draft.duration_min,
            draft.activity,
        )
    }

    /// A list entry was activated; re-center the map on its workout
    pub fn handle_entry_activated(&mut self, id: &str) -> Result<()> {
        let workout = match self.store.find_by_id(id) {
            Ok(workout) => workout,
            Err(e) => {
                tracing::warn!("Activated entry has no workout: {}", e);
                return Err(e);
            }
        };

        if self.map_state == MapState::Uninitialized {
            tracing::debug!("Map not initialized, not moving to {}", id);
            return Ok(());
        }
        self.map
            .set_center(workout.coordinates(), self.settings.zoom_level);
        Ok(())
    }

    /// Write the whole store to the blob store
    pub fn persist(&mut self) -> Result<()> {
        let blob = codec::encode(&self.store)?;
        self.blobs.set(&self.settings.storage_key, &blob)?;
        tracing::debug!("Persisted {} workouts", self.store.len());
        Ok(())
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn form_state(&self) -> FormState {
        self.form
    }

    pub fn map_state(&self) -> MapState {
        self.map_state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn list(&self) -> &R {
        &self.list
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }
}
