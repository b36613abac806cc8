#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result};
use clap::Parser;
use mapty::app::App;
use mapty::cli::{AddCmd, Cli, Cmd};
use mapty::error::AppError;
use mapty::store::SqliteStore;
use mapty::terminal::{FixedPosition, TerminalMap, TerminalView};
use mapty::types::{FormInput, WorkoutKind};
use mapty::utils;

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config = cli.config();
    let cmd = cli.cmd.unwrap_or(Cmd::List);
    let listing = matches!(cmd, Cmd::List);
    dlog!(
        "db={} key={} position={:?} listing={}",
        config.db_path.display(),
        config.storage_key,
        cli.position,
        listing
    );

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("opening workout store: {}", config.db_path.display()))?;

    let mut app: App<_, _, TerminalMap> =
        App::start(config, store, TerminalView::new(listing));

    let mut geo = FixedPosition(cli.position);
    let located = app.locate(&mut geo, |center, zoom| {
        let map = TerminalMap::new(center, zoom);
        if listing { map } else { map.quiet() }
    });
    if let Err(e) = &located {
        tracing::debug!(error = %e, "continuing without a map");
    }

    match cmd {
        Cmd::List => {
            if app.workouts().is_empty() {
                println!("No workouts recorded yet.");
            }
        }
        Cmd::Add { workout } => {
            let (kind, at, input) = match workout {
                AddCmd::Running { common, cadence } => (
                    WorkoutKind::Running,
                    common.at,
                    FormInput::running(&common.distance, &common.duration, &cadence),
                ),
                AddCmd::Cycling { common, elevation } => (
                    WorkoutKind::Cycling,
                    common.at,
                    FormInput::cycling(&common.distance, &common.duration, &elevation),
                ),
            };

            app.on_map_click(at)
                .context("a map is needed to place workouts; pass --position LAT,LNG")?;
            app.choose_kind(kind);
            let w = app.submit(&input)?;
            println!("Recorded {} [{}]", w.description(), w.id());
        }
        Cmd::Select { id } => match app.select(&id) {
            Ok(w) => println!("{} (selected {} times)", w.description(), w.clicks()),
            Err(AppError::MissingMapContext) => {
                anyhow::bail!("a map is needed to show workout {id}; pass --position LAT,LNG")
            }
            Err(e) => return Err(e.into()),
        },
        Cmd::Reset => {
            app.reset();
            println!("All workouts deleted.");
        }
    }

    Ok(())
}
