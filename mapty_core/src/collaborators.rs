//! Interfaces to the components the controller drives but does not own.
//!
//! Event sources (map clicks, map readiness, form submission, list entry
//! activation) are not modelled as callback registration. The entry point
//! forwards each event to the matching `WorkoutController::handle_*` method.

use crate::{Coordinates, EntryView, FormInput, WorkoutKind};

/// Interactive map widget
pub trait MapView {
    /// Center the view on a coordinate at the given zoom level
    fn set_center(&mut self, coordinates: Coordinates, zoom: u8);

    /// Add a marker with a popup label
    fn place_marker(&mut self, coordinates: Coordinates, kind: WorkoutKind, label: &str);
}

/// Workout entry form
pub trait InputSource {
    /// Current raw field values
    fn read(&self) -> FormInput;

    fn show(&mut self);

    /// Reset every field and hide the form
    fn clear_and_hide(&mut self);

    /// Show the variant field relevant to `kind` (cadence or elevation)
    fn show_field_for(&mut self, kind: WorkoutKind);
}

/// Workout list
pub trait RenderSink {
    /// Append one entry to the list
    fn render_entry(&mut self, entry: &EntryView);
}

/// User-facing messages (alerts)
pub trait Notifier {
    fn notify(&mut self, message: &str);
}
