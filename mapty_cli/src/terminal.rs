//! Terminal-backed collaborators for the workout controller.
//!
//! The map and list remember what they were last asked to show so one-shot
//! commands can report on it afterwards. With `echo` enabled (interactive
//! shell) output is printed as it happens.

use mapty_core::*;

/// Map view that prints centering and markers
#[derive(Default)]
pub struct TerminalMap {
    pub echo: bool,
    pub center: Option<(Coordinates, u8)>,
}

impl MapView for TerminalMap {
    fn set_center(&mut self, coordinates: Coordinates, zoom: u8) {
        if self.echo {
            println!("Map centered on {} (zoom {})", coordinates, zoom);
        }
        self.center = Some((coordinates, zoom));
    }

    fn place_marker(&mut self, coordinates: Coordinates, kind: WorkoutKind, label: &str) {
        if self.echo {
            println!("📍 [{}] {} at {}", kind.popup_class(), label, coordinates);
        }
    }
}

/// Form whose fields are filled from command-line arguments or shell input
#[derive(Default)]
pub struct CliForm {
    pub echo: bool,
    pub fields: FormInput,
}

impl InputSource for CliForm {
    fn read(&self) -> FormInput {
        self.fields.clone()
    }

    fn show(&mut self) {
        // The type selector starts on running, like a freshly opened form
        if self.fields.activity_type.is_empty() {
            self.fields.activity_type = WorkoutKind::Running.as_str().to_string();
        }
        if self.echo {
            println!("Form open: set distance, duration and cadence/elevation, then submit");
        }
    }

    fn clear_and_hide(&mut self) {
        self.fields = FormInput::default();
    }

    fn show_field_for(&mut self, kind: WorkoutKind) {
        if self.echo {
            let field = match kind {
                WorkoutKind::Running => "cadence",
                WorkoutKind::Cycling => "elevation",
            };
            println!("Activity set to {}, {} field shown", kind, field);
        }
    }
}

/// Workout list printed to stdout
#[derive(Default)]
pub struct TerminalList {
    pub echo: bool,
    pub entries: Vec<EntryView>,
}

impl RenderSink for TerminalList {
    fn render_entry(&mut self, entry: &EntryView) {
        if self.echo {
            println!("{}", format_entry(entry));
        }
        self.entries.push(entry.clone());
    }
}

/// Alerts written to stderr
#[derive(Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str) {
        eprintln!("⚠ {}", message);
    }
}

/// Two-line list entry
pub fn format_entry(entry: &EntryView) -> String {
    format!(
        "[{}] {} {}\n    {} {} · ⏱ {} {} · ⚡️ {} {} · {} {}",
        entry.id,
        entry.icon,
        entry.title,
        entry.distance.value,
        entry.distance.unit,
        entry.duration.value,
        entry.duration.unit,
        entry.metric.value,
        entry.metric.unit,
        entry.detail.value,
        entry.detail.unit,
    )
}
