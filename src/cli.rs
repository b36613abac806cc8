use crate::config::{AppConfig, DEFAULT_DB_PATH, DEFAULT_ZOOM_LEVEL};
use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::types::Coords;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Record running and cycling workouts at map coordinates",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,

    /// SQLite file holding the workout history.
    #[arg(long, env = "MAPTY_DB", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Storage key the workout list lives under.
    #[arg(long, default_value = DEFAULT_STORAGE_KEY, global = true)]
    pub key: String,

    /// Your current position as LAT,LNG. Without it no map is shown.
    #[arg(
        long,
        env = "MAPTY_POSITION",
        value_name = "LAT,LNG",
        allow_hyphen_values = true,
        global = true
    )]
    pub position: Option<Coords>,

    /// Map zoom level.
    #[arg(long, default_value_t = DEFAULT_ZOOM_LEVEL, global = true)]
    pub zoom: f64,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

impl Cli {
    pub fn config(&self) -> AppConfig {
        AppConfig {
            storage_key: self.key.clone(),
            zoom_level: self.zoom,
            db_path: self.db.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List recorded workouts and pin them on the map (default).
    List,

    /// Record a workout at a point on the map.
    Add {
        #[command(subcommand)]
        workout: AddCmd,
    },

    /// Select a workout by id and center the map on it.
    Select { id: String },

    /// Delete all recorded workouts.
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum AddCmd {
    /// A run: distance, duration and cadence.
    Running {
        #[command(flatten)]
        common: CommonFields,

        /// Steps per minute.
        #[arg(long, allow_hyphen_values = true)]
        cadence: String,
    },
    /// A ride: distance, duration and elevation gain.
    Cycling {
        #[command(flatten)]
        common: CommonFields,

        /// Elevation gain in meters.
        #[arg(long, allow_hyphen_values = true)]
        elevation: String,
    },
}

/// Values are kept as typed; the app validates them.
#[derive(Args, Debug)]
pub struct CommonFields {
    /// Where the workout happened, LAT,LNG.
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub at: Coords,

    /// Distance in km.
    #[arg(long, allow_hyphen_values = true)]
    pub distance: String,

    /// Duration in minutes.
    #[arg(long, allow_hyphen_values = true)]
    pub duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_running() {
        let cli = Cli::try_parse_from([
            "mapty",
            "--position",
            "10,20",
            "add",
            "running",
            "--at",
            "10.1,20.2",
            "--distance",
            "5",
            "--duration",
            "30",
            "--cadence",
            "180",
        ])
        .unwrap();
        assert_eq!(cli.position, Some(Coords::new(10.0, 20.0)));
        let Some(Cmd::Add {
            workout: AddCmd::Running { common, cadence },
        }) = cli.cmd
        else {
            panic!("expected add running");
        };
        assert_eq!(common.at, Coords::new(10.1, 20.2));
        assert_eq!(common.distance, "5");
        assert_eq!(cadence, "180");
    }

    #[test]
    fn config_defaults() {
        let cli = Cli::try_parse_from(["mapty", "list"]).unwrap();
        let cfg = cli.config();
        assert_eq!(cfg.storage_key, "workout");
        assert!((cfg.zoom_level - 16.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_position() {
        assert!(Cli::try_parse_from(["mapty", "--position", "north", "list"]).is_err());
    }
}
