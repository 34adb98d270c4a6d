#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrates one simulation run from validated config to result.
//!
//! The pipeline is strictly one-directional: climate accumulation feeds the
//! generation simulator, whose state feeds the yield aggregation, the
//! recommendation thresholds and the economic comparison. Every stochastic
//! draw flows through the single source owned by the run, so the stage
//! order below is the reproducibility contract for seeded sources.

use thiserror::Error;
use vinemoth_core::{
    ConfigError, Generation, RateRange, SimulationConfig, SimulationResult, SimulationState,
    BASE_YIELD_KG_PER_HECTARE, GENERATION_LIMIT,
};
use vinemoth_system_assessment as assessment;
use vinemoth_system_generations as generations;
use vinemoth_system_phenology::{self as phenology, SeasonDegreeDays};
use vinemoth_system_sampling::{ChaChaSource, Lcg, SampleError, Samplers, UniformSource};

/// Failures surfaced by a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// The configuration was rejected before any sampling.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A sampler rejected its inputs mid-run.
    #[error("sampling failed: {0}")]
    Sampling(#[from] SampleError),
}

/// Result plus the intermediate values a diagnostic consumer may want.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationTrace {
    /// Degree-day accumulation that gated the generation count.
    pub season: SeasonDegreeDays,
    /// Final per-run accumulators.
    pub state: SimulationState,
    /// The published result.
    pub result: SimulationResult,
}

/// Runs one simulation over the provided uniform source.
pub fn run<S: UniformSource>(
    config: &SimulationConfig,
    source: S,
) -> Result<SimulationResult, SimulationError> {
    run_traced(config, source).map(|trace| trace.result)
}

/// Runs one simulation and also returns the state trajectory.
pub fn run_traced<S: UniformSource>(
    config: &SimulationConfig,
    source: S,
) -> Result<SimulationTrace, SimulationError> {
    let method = config.validate()?;
    let profile = config.grape_variety.profile();

    let mut samplers = Samplers::new(source);
    let mut state = SimulationState::new();

    let season = phenology::accumulate_season(profile.growth_window(), &mut samplers);
    state.add_degree_days(season.total());
    state.set_gross_yield_kg(f64::from(config.hectares) * BASE_YIELD_KG_PER_HECTARE);

    generations::establish_infestation(
        config.hectares,
        config.initial_infestation,
        &profile,
        &mut samplers,
        &mut state,
    );

    if state.infestation_occurred() {
        let capacity =
            generations::generation_capacity(state.accumulated_degree_days(), &mut samplers);
        state.set_generations(capacity);
        let control = method.map_or(RateRange::NONE, |m| m.effectiveness());
        generations::run_generations(&profile, control, &mut samplers, &mut state)?;
    }

    let summary = assessment::assess_yield(config.hectares, &state);
    let recommendations = assessment::recommendations(
        config.grape_variety,
        method,
        summary.yield_loss_percent,
        &summary.generation_impact,
    );
    let economic_impact =
        assessment::economic_impact(config.hectares, method, &profile, &state);

    let mut control_effectiveness = [0.0; GENERATION_LIMIT];
    for generation in Generation::ALL {
        control_effectiveness[generation.index()] =
            assessment::round_to_decimals(state.effectiveness(generation) * 100.0, 1);
    }

    let result = SimulationResult {
        grape_variety: config.grape_variety,
        control_method: method,
        yield_per_hectare: summary.yield_per_hectare,
        base_yield_per_hectare: summary.base_yield_per_hectare,
        yield_loss_percent: summary.yield_loss_percent,
        generation_impact: summary.generation_impact,
        control_effectiveness,
        recommendations,
        economic_impact,
    };

    Ok(SimulationTrace {
        season,
        state,
        result,
    })
}

/// Runs with the reference congruential generator, replaying the exact
/// trajectory of the original tool.
pub fn run_reference(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    run(config, Lcg::with_reference_parameters())
}

/// Runs deterministically from the provided seed.
pub fn run_seeded(
    config: &SimulationConfig,
    seed: u64,
) -> Result<SimulationResult, SimulationError> {
    run(config, ChaChaSource::from_seed(seed))
}

/// Runs with a source seeded from operating-system entropy.
pub fn run_with_entropy(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    run(config, ChaChaSource::from_entropy())
}
