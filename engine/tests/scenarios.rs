use vinemoth_core::{
    ControlMethod, ControlSelection, Generation, GrapeVariety, SimulationConfig,
    BASE_YIELD_KG_PER_HECTARE, GENERATION_LIMIT,
};
use vinemoth_engine::{run, run_traced, SimulationError};
use vinemoth_system_sampling::{ChaChaSource, UniformSource};

/// Source emitting cold draws for a prefix of the stream and a fixed unit
/// afterwards, used to decouple climate from establishment.
struct SplitSource {
    cold_draws: u64,
    emitted: u64,
    warm_unit: f64,
}

impl UniformSource for SplitSource {
    fn next_unit(&mut self) -> f64 {
        self.emitted += 1;
        if self.emitted <= self.cold_draws {
            0.0
        } else {
            self.warm_unit
        }
    }
}

#[test]
fn zero_infestation_ends_without_damage() {
    let config = SimulationConfig::new(
        GrapeVariety::Malbec,
        40,
        0.0,
        ControlSelection::single(ControlMethod::Insecticides),
    );
    let trace = run_traced(&config, ChaChaSource::from_seed(11)).expect("run");

    assert!(!trace.state.infestation_occurred());
    assert_eq!(trace.state.total_damage(), 0.0);
    assert_eq!(trace.result.yield_loss_percent, 0.0);
    assert_eq!(trace.result.yield_per_hectare, BASE_YIELD_KG_PER_HECTARE);
    assert_eq!(trace.result.recommendations.len(), 1);
}

#[test]
fn cold_season_gates_out_every_generation() {
    // Every climate draw is freezing, so no degree-days accumulate; the
    // warm tail then forces adults to land and infest. The capacity gate
    // must still keep all four generations from running.
    let config = SimulationConfig::new(
        GrapeVariety::Malbec,
        3,
        5.0,
        ControlSelection::none(),
    );
    let window = config.grape_variety.profile().growth_window();
    let climate_draws: u64 = window.iter().map(|m| u64::from(m.days()) * 12).sum();

    let source = SplitSource {
        cold_draws: climate_draws,
        emitted: 0,
        warm_unit: 0.1,
    };
    let trace = run_traced(&config, source).expect("run");

    assert!(trace.state.infestation_occurred());
    assert!(trace.state.eggs(Generation::First) > 0.0);
    assert_eq!(trace.season.total(), 0.0);
    assert_eq!(trace.state.generations(), 0);
    assert_eq!(trace.state.total_damage(), 0.0);
    assert_eq!(trace.result.yield_loss_percent, 0.0);
}

#[test]
fn invariants_hold_across_seeds_and_configs() {
    let configs = [
        SimulationConfig::new(GrapeVariety::Malbec, 1, 0.2, ControlSelection::none()),
        SimulationConfig::new(
            GrapeVariety::Malbec,
            25,
            2.0,
            ControlSelection::single(ControlMethod::PheromoneTraps),
        ),
        SimulationConfig::new(
            GrapeVariety::Torrontes,
            60,
            4.5,
            ControlSelection::single(ControlMethod::MatingDisruption),
        ),
        SimulationConfig::new(
            GrapeVariety::Torrontes,
            10,
            0.9,
            ControlSelection::single(ControlMethod::SterileInsectTechnique),
        ),
    ];

    for config in &configs {
        for seed in 0..25u64 {
            let trace = run_traced(config, ChaChaSource::from_seed(seed)).expect("run");
            let result = &trace.result;

            assert!((0.0..=100.0).contains(&result.yield_loss_percent));
            assert!(result.yield_per_hectare >= 0.0);
            assert!(trace.state.generations() <= GENERATION_LIMIT as u8);
            assert!(trace.season.total() >= 0.0);

            for generation in Generation::ALL {
                assert!(trace.state.damage(generation) >= 0.0);
                assert!(result.generation_impact[generation.index()] >= 0.0);
                let effectiveness = result.control_effectiveness[generation.index()];
                assert!((0.0..=100.0).contains(&effectiveness));
            }
        }
    }
}

#[test]
fn heavier_infestation_does_not_reduce_mean_damage() {
    let mean_damage = |density: f64| -> f64 {
        let config = SimulationConfig::new(
            GrapeVariety::Malbec,
            20,
            density,
            ControlSelection::none(),
        );
        let total: f64 = (0..40u64)
            .map(|seed| {
                run_traced(&config, ChaChaSource::from_seed(seed))
                    .expect("run")
                    .state
                    .total_damage()
            })
            .sum();
        total / 40.0
    };

    let light = mean_damage(0.5);
    let heavy = mean_damage(3.0);
    assert!(
        heavy >= light,
        "mean damage fell from {light} to {heavy} as density rose"
    );
}

#[test]
fn invalid_configurations_are_rejected_before_sampling() {
    let zero_area =
        SimulationConfig::new(GrapeVariety::Malbec, 0, 0.2, ControlSelection::none());
    assert!(matches!(
        run(&zero_area, ChaChaSource::from_seed(1)),
        Err(SimulationError::Config(_))
    ));

    let conflicting = SimulationConfig::new(
        GrapeVariety::Torrontes,
        5,
        0.2,
        vinemoth_core::ControlSelection {
            pheromone_traps: true,
            insecticides: true,
            ..ControlSelection::none()
        },
    );
    assert!(matches!(
        run(&conflicting, ChaChaSource::from_seed(1)),
        Err(SimulationError::Config(_))
    ));
}

#[test]
fn control_pressure_reduces_mean_damage() {
    // Mating disruption draws effectiveness in [0.8, 1.0]; averaged over
    // seeds it must undercut the uncontrolled season by a wide margin.
    let mean_damage = |selection: ControlSelection| -> f64 {
        let config = SimulationConfig::new(GrapeVariety::Malbec, 30, 3.0, selection);
        let total: f64 = (0..30u64)
            .map(|seed| {
                run_traced(&config, ChaChaSource::from_seed(seed))
                    .expect("run")
                    .state
                    .total_damage()
            })
            .sum();
        total / 30.0
    };

    let unchecked = mean_damage(ControlSelection::none());
    let suppressed = mean_damage(ControlSelection::single(ControlMethod::MatingDisruption));
    assert!(
        suppressed < unchecked,
        "mean damage {suppressed} not below uncontrolled mean {unchecked}"
    );
}
