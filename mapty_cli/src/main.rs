mod terminal;

use clap::{Parser, Subcommand};
use mapty_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use terminal::{format_entry, CliForm, StderrNotifier, TerminalList, TerminalMap};

#[derive(Parser)]
#[command(name = "mapty")]
#[command(about = "Map-based running and cycling workout log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout at a map position
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Activity type (running, cycling)
        #[arg(long = "type", default_value = "running")]
        activity_type: String,

        /// Distance in km
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        duration: String,

        /// Cadence in steps per minute (running)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// Elevation gain in metres (cycling)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// List logged workouts (default)
    List,

    /// Center the map on a logged workout
    Focus {
        /// Workout id as shown by `list`
        id: String,
    },

    /// Interactive session reading map and form events from stdin
    Shell,
}

type Controller =
    WorkoutController<TerminalMap, CliForm, TerminalList, StderrNotifier, FileBlobStore>;

fn main() -> Result<()> {
    // Initialize logging
    mapty_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.storage.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Add {
            lat,
            lng,
            activity_type,
            distance,
            duration,
            cadence,
            elevation,
        }) => cmd_add(
            build_controller(data_dir, &config, false),
            Coordinates::new(lat, lng),
            FormInput {
                activity_type,
                distance,
                duration,
                cadence,
                elevation,
            },
        ),
        Some(Commands::Focus { id }) => {
            cmd_focus(build_controller(data_dir, &config, false), &config, &id)
        }
        Some(Commands::Shell) => cmd_shell(build_controller(data_dir, &config, true), &config),
        Some(Commands::List) | None => cmd_list(build_controller(data_dir, &config, true)),
    }
}

/// Wire the terminal collaborators into a controller
fn build_controller(data_dir: PathBuf, config: &Config, echo: bool) -> Controller {
    WorkoutController::new(
        TerminalMap {
            echo,
            ..Default::default()
        },
        CliForm {
            echo,
            ..Default::default()
        },
        TerminalList {
            echo,
            ..Default::default()
        },
        StderrNotifier,
        FileBlobStore::new(data_dir),
        ControllerSettings::from(config),
    )
}

/// Starting position; the configured home stands in for device geolocation
fn locate(config: &Config) -> Result<Coordinates> {
    config.map.home.ok_or_else(|| {
        Error::GeolocationUnavailable("no home position configured (map.home)".into())
    })
}

/// Acquire the starting position and bring the map up
fn init_map(controller: &mut Controller, config: &Config) {
    controller.handle_geolocation(locate(config));
    if controller.map_state() == MapState::Centered {
        controller.handle_map_ready();
    }
}

fn cmd_add(mut controller: Controller, at: Coordinates, fields: FormInput) -> Result<()> {
    controller.start();

    controller.handle_map_click(at);
    controller.input_mut().fields = fields;
    match controller.handle_submit() {
        Ok(_) => {}
        // Already reported by the notifier
        Err(e) if e.is_user_facing() => std::process::exit(1),
        Err(e) => return Err(e),
    }

    if let Some(entry) = controller.list().entries.last() {
        println!("✓ Workout logged!");
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn cmd_list(mut controller: Controller) -> Result<()> {
    if controller.start() == 0 {
        println!("No workouts logged yet.");
    }
    Ok(())
}

fn cmd_focus(mut controller: Controller, config: &Config, id: &str) -> Result<()> {
    controller.start();
    init_map(&mut controller, config);

    controller.handle_entry_activated(id)?;

    let workout = controller.store().find_by_id(id)?;
    println!("{}", format_entry(&workout.entry_view()));
    match controller.map().center {
        Some((center, zoom)) if controller.map_state() == MapState::Ready => {
            println!("Map centered on {} (zoom {})", center, zoom);
        }
        _ => println!("Map unavailable; workout is at {}", workout.coordinates()),
    }
    Ok(())
}

fn cmd_shell(mut controller: Controller, config: &Config) -> Result<()> {
    controller.start();
    init_map(&mut controller, config);

    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match run_shell_command(&mut controller, line.trim()) {
            ShellFlow::Continue => {}
            ShellFlow::Quit => break,
        }
    }
    Ok(())
}

enum ShellFlow {
    Continue,
    Quit,
}

fn run_shell_command(controller: &mut Controller, line: &str) -> ShellFlow {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return ShellFlow::Quit,
        ["help"] => print_shell_help(),
        ["click", lat, lng] => match (lat.parse::<f64>(), lng.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => controller.handle_map_click(Coordinates::new(lat, lng)),
            _ => println!("Usage: click <lat> <lng>"),
        },
        ["type", kind] => match kind.parse::<WorkoutKind>() {
            Ok(kind) => {
                controller.input_mut().fields.activity_type = kind.as_str().to_string();
                controller.handle_type_changed(kind);
            }
            Err(e) => println!("{}", e),
        },
        ["set", field, value] => {
            let fields = &mut controller.input_mut().fields;
            let slot = match *field {
                "distance" => &mut fields.distance,
                "duration" => &mut fields.duration,
                "cadence" => &mut fields.cadence,
                "elevation" => &mut fields.elevation,
                other => {
                    println!("Unknown field: {}", other);
                    return ShellFlow::Continue;
                }
            };
            *slot = value.to_string();
        }
        ["submit"] => match controller.handle_submit() {
            Ok(id) => println!("✓ Workout {} logged!", id),
            // Validation problems were already shown by the notifier
            Err(e) if e.is_user_facing() => {}
            Err(e) => println!("{}", e),
        },
        ["select", id] => {
            if let Err(e) = controller.handle_entry_activated(id) {
                println!("{}", e);
            }
        }
        ["list"] => {
            if controller.store().is_empty() {
                println!("No workouts logged yet.");
            }
            for workout in controller.store().all() {
                println!("{}", format_entry(&workout.entry_view()));
            }
        }
        _ => println!("Unknown command: {} (try 'help')", line),
    }
    ShellFlow::Continue
}

fn print_shell_help() {
    println!("Commands:");
    println!("  click <lat> <lng>          open the form at a map position");
    println!("  type <running|cycling>     choose the activity type");
    println!("  set <field> <value>        distance, duration, cadence or elevation");
    println!("  submit                     log the workout");
    println!("  select <id>                center the map on a workout");
    println!("  list                       show all workouts");
    println!("  quit");
}
