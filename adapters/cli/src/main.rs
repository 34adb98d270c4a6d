#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs vineyard moth simulations.

mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use vinemoth_core::{
    ControlMethod, ControlSelection, GrapeVariety, SimulationConfig, SimulationResult,
    DEFAULT_ADULTS_PER_HECTARE,
};

/// Command-line arguments accepted by the simulator.
#[derive(Debug, Parser)]
#[command(
    name = "vinemoth",
    about = "Vineyard moth population and yield-loss simulator"
)]
struct Cli {
    /// Grape variety planted across the vineyard.
    #[arg(long, value_enum, default_value = "malbec")]
    variety: VarietyArg,

    /// Vineyard area in whole hectares.
    #[arg(long, default_value_t = 1)]
    hectares: u32,

    /// Mean adult pest density per hectare.
    #[arg(long, default_value_t = DEFAULT_ADULTS_PER_HECTARE)]
    infestation: f64,

    /// Control method to deploy; omit to simulate an untreated season.
    #[arg(long, value_enum)]
    control: Option<ControlArg>,

    /// TOML scenario file that replaces the individual config flags.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Seed for a reproducible run; omit to seed from system entropy.
    #[arg(long, conflicts_with = "reference_rng")]
    seed: Option<u64>,

    /// Replay with the legacy congruential generator instead of the
    /// production source.
    #[arg(long)]
    reference_rng: bool,

    /// Emit the result as JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

/// Grape varieties selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VarietyArg {
    /// Malbec.
    Malbec,
    /// Torrontés Riojano.
    Torrontes,
}

impl From<VarietyArg> for GrapeVariety {
    fn from(arg: VarietyArg) -> Self {
        match arg {
            VarietyArg::Malbec => Self::Malbec,
            VarietyArg::Torrontes => Self::Torrontes,
        }
    }
}

/// Control methods selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ControlArg {
    /// Pheromone traps.
    PheromoneTraps,
    /// Mating disruption.
    MatingDisruption,
    /// Insecticide applications.
    Insecticides,
    /// Sterile insect technique.
    SterileInsectTechnique,
}

impl From<ControlArg> for ControlMethod {
    fn from(arg: ControlArg) -> Self {
        match arg {
            ControlArg::PheromoneTraps => Self::PheromoneTraps,
            ControlArg::MatingDisruption => Self::MatingDisruption,
            ControlArg::Insecticides => Self::Insecticides,
            ControlArg::SterileInsectTechnique => Self::SterileInsectTechnique,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    info!(
        variety = config.grape_variety.display_name(),
        hectares = config.hectares,
        infestation = config.initial_infestation,
        "starting simulation"
    );

    let result = execute(&cli, &config)?;

    info!(
        yield_loss_percent = result.yield_loss_percent,
        yield_per_hectare = result.yield_per_hectare,
        "simulation complete"
    );

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("encoding result as JSON")?
        );
    } else {
        print!("{}", report::render(&result));
    }
    Ok(())
}

fn execute(cli: &Cli, config: &SimulationConfig) -> Result<SimulationResult> {
    let result = if cli.reference_rng {
        vinemoth_engine::run_reference(config)
    } else if let Some(seed) = cli.seed {
        vinemoth_engine::run_seeded(config, seed)
    } else {
        vinemoth_engine::run_with_entropy(config)
    };
    result.context("simulation failed")
}

fn resolve_config(cli: &Cli) -> Result<SimulationConfig> {
    if let Some(path) = &cli.scenario {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario file {}", path.display()))?;
        return config_from_toml(&text);
    }

    let control_methods = cli
        .control
        .map_or_else(ControlSelection::none, |arg| {
            ControlSelection::single(arg.into())
        });
    Ok(SimulationConfig::new(
        cli.variety.into(),
        cli.hectares,
        cli.infestation,
        control_methods,
    ))
}

fn config_from_toml(text: &str) -> Result<SimulationConfig> {
    toml::from_str(text).context("parsing scenario file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn argument_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_build_the_expected_config() {
        let cli = Cli::try_parse_from([
            "vinemoth",
            "--variety",
            "torrontes",
            "--hectares",
            "8",
            "--infestation",
            "0.4",
            "--control",
            "mating-disruption",
        ])
        .expect("parse");

        let config = resolve_config(&cli).expect("config");
        assert_eq!(config.grape_variety, GrapeVariety::Torrontes);
        assert_eq!(config.hectares, 8);
        assert_eq!(config.initial_infestation, 0.4);
        assert_eq!(
            config.control_methods.active_method().expect("valid"),
            Some(ControlMethod::MatingDisruption)
        );
    }

    #[test]
    fn defaults_simulate_one_untreated_hectare() {
        let cli = Cli::try_parse_from(["vinemoth"]).expect("parse");
        let config = resolve_config(&cli).expect("config");
        assert_eq!(config.hectares, 1);
        assert_eq!(config.initial_infestation, DEFAULT_ADULTS_PER_HECTARE);
        assert_eq!(config.control_methods, ControlSelection::none());
    }

    #[test]
    fn seed_conflicts_with_the_reference_generator() {
        let parsed = Cli::try_parse_from(["vinemoth", "--seed", "7", "--reference-rng"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn scenario_toml_round_trips_into_a_config() {
        let config = config_from_toml(
            r#"
            grape_variety = "malbec"
            hectares = 12
            initial_infestation = 0.2

            [control_methods]
            insecticides = true
            "#,
        )
        .expect("parse scenario");
        assert_eq!(config.grape_variety, GrapeVariety::Malbec);
        assert_eq!(
            config.control_methods.active_method().expect("valid"),
            Some(ControlMethod::Insecticides)
        );
    }
}
