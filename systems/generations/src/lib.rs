#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Multi-generation pest population simulator.
//!
//! A run either never establishes an infestation (terminal, zero damage) or
//! walks through up to four generations, each gated by the degree-day
//! capacity of the season. Generation one is seeded by the adults that
//! landed during establishment; every later generation is seeded by its
//! immediate predecessor's damage count standing in for the surviving adult
//! population, a deliberate modelling simplification.

use vinemoth_core::{
    Generation, RateRange, SimulationState, VarietyProfile, ADULT_FEMALE_FERTILITY,
    GENERATION_DEGREE_DAYS, GENERATION_LIMIT, LARVAL_MORTALITY,
};
use vinemoth_system_sampling::{SampleError, Samplers, UniformSource};

/// Attempts to establish the initial infestation across the vineyard.
///
/// Each hectare draws a Poisson count of arriving adults. When more than one
/// adult lands, the female half each get one chance to infest a cluster; a
/// unit draw at or below the variety's cluster probability flags the run as
/// infested and lays a normal draw of eggs into generation one.
pub fn establish_infestation<S: UniformSource>(
    hectares: u32,
    initial_infestation: f64,
    profile: &VarietyProfile,
    samplers: &mut Samplers<S>,
    state: &mut SimulationState,
) {
    for _ in 0..hectares {
        let adults = samplers.poisson(initial_infestation);
        if adults <= 1 {
            continue;
        }
        for _ in 0..adults / 2 {
            let chance = samplers.unit();
            if chance <= profile.cluster_infestation_probability() {
                state.mark_infested();
                let eggs = samplers.normal(
                    ADULT_FEMALE_FERTILITY.mean(),
                    ADULT_FEMALE_FERTILITY.deviation(),
                );
                state.add_eggs(Generation::First, eggs);
            }
        }
    }
}

/// Determines how many generations the accumulated degree-days sustain.
///
/// The per-generation requirement is drawn once; requirements are then
/// stacked until they cover the season total, so a partially covered
/// requirement still counts as a generation. The count caps at
/// [`GENERATION_LIMIT`] and a season with no accumulation sustains none.
pub fn generation_capacity<S: UniformSource>(
    total_degree_days: f64,
    samplers: &mut Samplers<S>,
) -> u8 {
    let requirement = samplers.normal(
        GENERATION_DEGREE_DAYS.mean(),
        GENERATION_DEGREE_DAYS.deviation(),
    );

    let mut count: u8 = 0;
    let mut covered = 0.0;
    while covered < total_degree_days {
        count += 1;
        covered += requirement;
        if count == GENERATION_LIMIT as u8 {
            break;
        }
    }
    count
}

/// Runs survival and damage for every generation the season sustains.
///
/// Per generation the control effectiveness and larval mortality are drawn,
/// the surviving larvae individually deal Poisson-distributed fruit damage,
/// and the next generation's eggs are derived from this generation's damage
/// when the capacity allows one. The degree-day gate applies uniformly to
/// all four generations.
pub fn run_generations<S: UniformSource>(
    profile: &VarietyProfile,
    control: RateRange,
    samplers: &mut Samplers<S>,
    state: &mut SimulationState,
) -> Result<(), SampleError> {
    for generation in Generation::ALL {
        if generation.ordinal() > state.generations() {
            break;
        }

        if let Some(previous) = generation.previous() {
            let fertility = samplers.normal(
                ADULT_FEMALE_FERTILITY.mean(),
                ADULT_FEMALE_FERTILITY.deviation(),
            );
            let eggs = (state.damage(previous) * fertility / 2.0).round();
            state.set_eggs(generation, eggs);
        }

        let effectiveness = samplers.uniform(control.min(), control.max())?;
        state.record_effectiveness(generation, effectiveness);
        let mortality = samplers.uniform(LARVAL_MORTALITY.min(), LARVAL_MORTALITY.max())?;

        let surviving =
            state.eggs(generation) * (1.0 - mortality) * (1.0 - effectiveness);

        let mut damage = 0.0;
        for _ in 0..surviving as u64 {
            damage += samplers.poisson(profile.damage_per_larva(generation)) as f64;
        }
        state.record_damage(generation, damage);
    }

    Ok(())
}
