#![forbid(unsafe_code)]

//! Core domain model and application state for the Mapty workout log.
//!
//! This crate provides:
//! - Domain types (workouts, activity kinds, coordinates)
//! - Workout construction with derived metrics
//! - Form validation
//! - The in-memory workout store and its JSON codec
//! - Collaborator interfaces and blob storage
//! - The controller that ties them together

pub mod types;
pub mod error;
pub mod workout;
pub mod form;
pub mod store;
pub mod codec;
pub mod blob;
pub mod collaborators;
pub mod config;
pub mod logging;
pub mod controller;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use store::WorkoutStore;
pub use config::Config;
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use collaborators::{InputSource, MapView, Notifier, RenderSink};
pub use controller::{ControllerSettings, FormState, MapState, WorkoutController};
