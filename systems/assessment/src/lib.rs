#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Yield/loss aggregation over a finished simulation state, plus the
//! recommendation thresholds and the economic comparison derived from it.

mod economics;
mod recommendations;

pub use economics::economic_impact;
pub use recommendations::recommendations;

use vinemoth_core::{
    Generation, SimulationState, BASE_YIELD_KG_PER_HECTARE, GENERATION_LIMIT,
};

/// Aggregated yield figures for one finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YieldSummary {
    /// Net harvestable yield per hectare, floored to a whole kilogram.
    pub yield_per_hectare: f64,
    /// Undamaged baseline yield per hectare.
    pub base_yield_per_hectare: f64,
    /// Yield loss versus the baseline, clamped to `[0, 100]` percent.
    pub yield_loss_percent: f64,
    /// Per-generation share of the baseline lost, rounded to two decimals.
    pub generation_impact: [f64; GENERATION_LIMIT],
}

/// Combines gross yield and accumulated damage into the run's yield figures.
///
/// The caller guarantees a positive hectare count; validation happens before
/// the engine runs.
#[must_use]
pub fn assess_yield(hectares: u32, state: &SimulationState) -> YieldSummary {
    let area = f64::from(hectares);
    let gross = state.gross_yield_kg();
    let net = gross - state.total_damage();

    let gross_per_hectare = gross / area;
    let net_per_hectare = net / area;

    let raw_loss = 100.0 - (net_per_hectare * 100.0) / gross_per_hectare;
    let yield_loss_percent = raw_loss.clamp(0.0, 100.0);

    let mut generation_impact = [0.0; GENERATION_LIMIT];
    for generation in Generation::ALL {
        let share = state.damage(generation) / BASE_YIELD_KG_PER_HECTARE * 100.0;
        generation_impact[generation.index()] = round_to_decimals(share, 2);
    }

    YieldSummary {
        yield_per_hectare: net_per_hectare.floor(),
        base_yield_per_hectare: BASE_YIELD_KG_PER_HECTARE,
        yield_loss_percent,
        generation_impact,
    }
}

/// Rounds half away from zero to the requested number of decimals.
#[must_use]
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
