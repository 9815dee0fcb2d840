#![warn(missing_docs)]

//! Entry point for the `snap-sim` binary.

mod cli;
mod error;
mod run;
mod scenario;

use std::{io, path::Path, process};

use clap::Parser;
use snap_engine::{OccupancyAnalyzer, SnapConfig, SnapDirection, SnapState, lookup};
use snap_geom::Zone;
use snap_world::WindowOps;
use tokio::runtime::Builder;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{Cli, Commands, PreviewArgs, RunArgs},
    error::{Error, Result},
    scenario::Scenario,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    let env_filter = logging::env_filter_from_spec(&log.spec());
    registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .try_init()
        .ok();

    match command {
        Commands::Run(args) => run_scenario(&args),
        Commands::Preview(args) => preview(&args),
        Commands::Table => {
            print_table();
            Ok(())
        }
    }
}

/// Load an optional config file.
fn load_config(path: Option<&Path>) -> Result<Option<SnapConfig>> {
    path.map(|p| {
        info!(path = %p.display(), "loading snap config");
        SnapConfig::load(p).map_err(Error::from)
    })
    .transpose()
}

/// `run`: replay a scenario and print the report.
fn run_scenario(args: &RunArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let cfg = scenario.config_with(load_config(args.config.as_deref())?);
    let runtime = Builder::new_current_thread()
        .enable_time()
        .start_paused(!args.real_time)
        .build()?;
    let report = runtime.block_on(run::replay(&scenario, cfg));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// `preview`: zones and first candidates after snapping into a zone.
fn preview(args: &PreviewArgs) -> Result<()> {
    let zone = Zone::from_spec(&args.zone).ok_or_else(|| Error::UnknownZone(args.zone.clone()))?;
    let scenario = Scenario::load(&args.scenario)?;
    let cfg = scenario.config_with(load_config(args.config.as_deref())?);
    let world = scenario.world();
    let usable = world.usable_area(1).map_err(snap_engine::Error::from)?;
    let snapshot = world.snapshot_windows(1);
    let analyzer = OccupancyAnalyzer::new(&cfg);

    let zones = analyzer.zones_needing_fill(zone, usable, &snapshot);
    if zones.is_empty() {
        println!("after {zone}: nothing to fill");
        return Ok(());
    }
    let names: Vec<_> = zones.iter().map(|z| z.to_spec()).collect();
    println!("after {zone}: {}", names.join(", "));
    // The window snapped into `zone` would be the frontmost one.
    let excluded: Vec<_> = snapshot.first().map(|w| w.id).into_iter().collect();
    for z in zones {
        let offered = analyzer.candidates(z, usable, &snapshot, &excluded);
        let apps: Vec<_> = offered.iter().map(|w| w.app.as_str()).collect();
        println!("  {:<14} {}", z.to_spec(), apps.join(", "));
    }
    Ok(())
}

/// `table`: one row per state, one column per direction.
fn print_table() {
    print!("{:<14}", "from");
    for d in SnapDirection::ALL {
        print!(" {:<18}", d.to_spec());
    }
    println!();
    for s in SnapState::ALL {
        print!("{:<14}", s.to_string());
        for d in SnapDirection::ALL {
            let cell = lookup(s, d).map_or_else(|| "-".to_string(), |t| t.to_string());
            print!(" {cell:<18}");
        }
        println!();
    }
}
