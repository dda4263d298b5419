#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that scripts Hexfall chain reactions.

mod config;
mod scenario;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use hexfall_core::Event;
use hexfall_world::{query, ArenaConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scenario::Scenario;

/// Runs a Hex chain-reaction scenario and prints the resulting event log.
#[derive(Debug, Parser)]
#[command(name = "hexfall", version, about)]
struct Args {
    /// Optional TOML file overriding the arena tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of entities lined up in the chain.
    #[arg(long, default_value_t = 5)]
    chain: u32,
    /// Distance between neighbouring chain links, in world units.
    #[arg(long, default_value_t = 2.0)]
    spacing: f32,
    /// Health of every spawned entity.
    #[arg(long, default_value_t = 10.0)]
    health: f32,
    /// Hex stacks applied to the first link before it dies.
    #[arg(long, default_value_t = 6)]
    stacks: u8,
    /// Number of randomly placed bystanders.
    #[arg(long, default_value_t = 0)]
    scatter: u32,
    /// Seed used to place bystanders.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Output format for the event log.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Entry point for the Hexfall command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level)?;

    if !args.spacing.is_finite() || args.spacing <= 0.0 {
        bail!("--spacing must be a positive number (got {})", args.spacing);
    }
    if !args.health.is_finite() || args.health <= 0.0 {
        bail!("--health must be a positive number (got {})", args.health);
    }

    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => ArenaConfig::default(),
    };
    tracing::info!(
        detonation_radius = config.detonation_radius(),
        incoming_damage_scale = config.incoming_damage_scale(),
        spawn_health_scale = config.spawn_health_scale(),
        "arena configured"
    );

    let scenario = Scenario {
        chain: args.chain,
        spacing: args.spacing,
        health: args.health,
        stacks: args.stacks,
        scatter: args.scatter,
        seed: args.seed,
    };
    let outcome = scenario.run(config);

    for event in &outcome.events {
        match args.format {
            Format::Text => {
                if !matches!(event, Event::TimeAdvanced { .. }) {
                    println!("{event:?}");
                }
            }
            Format::Json => {
                let line = serde_json::to_string(event).context("failed to encode event")?;
                println!("{line}");
            }
        }
    }

    tracing::info!(
        killed = query::entities_killed(&outcome.world),
        survivors = query::entity_count(&outcome.world),
        clock_ms = query::clock(&outcome.world).as_millis() as u64,
        "scenario finished"
    );
    Ok(())
}

fn setup_logging(default_filter: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter `{default_filter}`"))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}
