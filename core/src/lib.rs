#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the vinemoth simulation engine.
//!
//! This crate defines the data surface that connects adapters and the pure
//! simulation systems. Adapters build a [`SimulationConfig`], the engine
//! threads a fresh [`SimulationState`] through each pipeline stage, and the
//! run concludes with an immutable [`SimulationResult`] for reporting
//! collaborators. The static agronomic tables (variety profiles, monthly
//! climate normals, control-method effectiveness ranges) also live here so
//! that every system reads the same compiled-in numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of pest generations a growing season can sustain.
pub const GENERATION_LIMIT: usize = 4;

/// Developmental temperature threshold in degrees Celsius; only the excess
/// above this value counts toward degree-day accumulation.
pub const DEVELOPMENT_THRESHOLD_CELSIUS: f64 = 15.0;

/// Undamaged grape yield per hectare in kilograms, used as the gross-yield
/// baseline for every run.
pub const BASE_YIELD_KG_PER_HECTARE: f64 = 13_557.0;

/// Default mean adult density per hectare offered to form collaborators.
pub const DEFAULT_ADULTS_PER_HECTARE: f64 = 0.2;

/// Mean and deviation of eggs laid by one adult female.
pub const ADULT_FEMALE_FERTILITY: NormalParameters = NormalParameters::new(134.84, 15.68);

/// Mean and deviation of the degree-day budget one generation consumes.
pub const GENERATION_DEGREE_DAYS: NormalParameters = NormalParameters::new(435.0, 2.3);

/// Range of natural larval mortality applied to every generation.
pub const LARVAL_MORTALITY: RateRange = RateRange::new(0.05, 0.17);

/// Parameters of a normal distribution used by the samplers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalParameters {
    mean: f64,
    deviation: f64,
}

impl NormalParameters {
    /// Creates normal-distribution parameters from a mean and deviation.
    #[must_use]
    pub const fn new(mean: f64, deviation: f64) -> Self {
        Self { mean, deviation }
    }

    /// Mean of the distribution.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation of the distribution.
    #[must_use]
    pub const fn deviation(&self) -> f64 {
        self.deviation
    }
}

/// Closed interval of rates in `[0, 1]` sampled uniformly per generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateRange {
    min: f64,
    max: f64,
}

impl RateRange {
    /// Degenerate range representing the absence of any effect.
    pub const NONE: Self = Self::new(0.0, 0.0);

    /// Creates a rate range from its inclusive bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Lower bound of the range.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the range.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }
}

/// Grape varieties the simulator models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrapeVariety {
    /// Malbec, the longer-season red variety.
    Malbec,
    /// Torrontés Riojano, the shorter-season white variety.
    Torrontes,
}

impl GrapeVariety {
    /// Human-readable variety name used in recommendation text.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Malbec => "Malbec",
            Self::Torrontes => "Torrontés Riojano",
        }
    }

    /// Agronomic profile backing this variety.
    #[must_use]
    pub const fn profile(&self) -> VarietyProfile {
        match self {
            Self::Malbec => VarietyProfile {
                growth_window: &[
                    Month::September,
                    Month::October,
                    Month::November,
                    Month::December,
                    Month::January,
                    Month::February,
                    Month::March,
                ],
                cluster_infestation_probability: 0.3,
                damage_per_generation: [0.01, 0.05, 0.1, 0.02],
                crop_value_per_hectare: 2_500.0,
            },
            Self::Torrontes => VarietyProfile {
                growth_window: &[
                    Month::September,
                    Month::October,
                    Month::November,
                    Month::December,
                    Month::January,
                    Month::February,
                ],
                cluster_infestation_probability: 0.18,
                damage_per_generation: [0.01, 0.04, 0.08, 0.015],
                crop_value_per_hectare: 2_200.0,
            },
        }
    }
}

/// Static agronomic constants keyed by grape variety.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VarietyProfile {
    growth_window: &'static [Month],
    cluster_infestation_probability: f64,
    damage_per_generation: [f64; GENERATION_LIMIT],
    crop_value_per_hectare: f64,
}

impl VarietyProfile {
    /// Ordered calendar months spanning the variety's growing season.
    #[must_use]
    pub const fn growth_window(&self) -> &'static [Month] {
        self.growth_window
    }

    /// Probability that one adult successfully infests a cluster.
    #[must_use]
    pub const fn cluster_infestation_probability(&self) -> f64 {
        self.cluster_infestation_probability
    }

    /// Poisson mean of fruit loss caused by one surviving larva of the
    /// provided generation.
    #[must_use]
    pub const fn damage_per_larva(&self, generation: Generation) -> f64 {
        self.damage_per_generation[generation.index()]
    }

    /// Commercial value of one undamaged hectare in dollars.
    #[must_use]
    pub const fn crop_value_per_hectare(&self) -> f64 {
        self.crop_value_per_hectare
    }
}

/// Calendar months covered by the climate table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    /// First month of the southern-hemisphere growing season.
    September,
    /// October.
    October,
    /// November.
    November,
    /// December.
    December,
    /// January.
    January,
    /// February.
    February,
    /// March, reached only by the longer Malbec season.
    March,
}

impl Month {
    /// Number of calendar days in the month.
    #[must_use]
    pub const fn days(&self) -> u32 {
        match self {
            Self::September | Self::November => 30,
            Self::October | Self::December | Self::January | Self::March => 31,
            Self::February => 28,
        }
    }

    /// Historical daily-temperature normals for the month.
    #[must_use]
    pub const fn climate(&self) -> ClimateNormals {
        match self {
            Self::September => ClimateNormals::new(16.4, 8.6),
            Self::October => ClimateNormals::new(20.6, 8.1),
            Self::November => ClimateNormals::new(23.9, 7.8),
            Self::December => ClimateNormals::new(26.0, 7.7),
            Self::January => ClimateNormals::new(26.4, 7.3),
            Self::February => ClimateNormals::new(24.8, 7.1),
            Self::March => ClimateNormals::new(23.0, 6.8),
        }
    }

    /// English month name used in reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
        }
    }
}

/// Mean daily temperature and deviation for one month, in degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateNormals {
    mean_temperature: f64,
    deviation: f64,
}

impl ClimateNormals {
    /// Creates climate normals from a mean temperature and deviation.
    #[must_use]
    pub const fn new(mean_temperature: f64, deviation: f64) -> Self {
        Self {
            mean_temperature,
            deviation,
        }
    }

    /// Mean daily temperature for the month.
    #[must_use]
    pub const fn mean_temperature(&self) -> f64 {
        self.mean_temperature
    }

    /// Standard deviation of the daily temperature.
    #[must_use]
    pub const fn deviation(&self) -> f64 {
        self.deviation
    }
}

/// Pest generations within one growing season, ordered first to fourth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Generation {
    /// First generation, seeded by the initial adult infestation.
    First,
    /// Second generation.
    Second,
    /// Third generation.
    Third,
    /// Fourth and final generation the model tracks.
    Fourth,
}

impl Generation {
    /// All generations in chronological order.
    pub const ALL: [Self; GENERATION_LIMIT] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    /// Zero-based index into per-generation arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
        }
    }

    /// One-based ordinal used in reports.
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// The generation immediately preceding this one, if any.
    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        match self {
            Self::First => None,
            Self::Second => Some(Self::First),
            Self::Third => Some(Self::Second),
            Self::Fourth => Some(Self::Third),
        }
    }
}

/// Pest-control methods a vineyard manager can deploy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMethod {
    /// Pheromone traps used for monitoring and limited mass capture.
    PheromoneTraps,
    /// Mating disruption via pheromone dispensers.
    MatingDisruption,
    /// Insecticide applications timed to flight peaks.
    Insecticides,
    /// Sterile insect technique releases.
    SterileInsectTechnique,
}

impl ControlMethod {
    /// Human-readable method name used in reports.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::PheromoneTraps => "pheromone traps",
            Self::MatingDisruption => "mating disruption",
            Self::Insecticides => "insecticides",
            Self::SterileInsectTechnique => "sterile insect technique",
        }
    }

    /// Effectiveness interval the per-generation draw is taken from.
    #[must_use]
    pub const fn effectiveness(&self) -> RateRange {
        match self {
            Self::PheromoneTraps => RateRange::new(0.05, 0.25),
            Self::MatingDisruption => RateRange::new(0.8, 1.0),
            Self::Insecticides => RateRange::new(0.8, 0.95),
            Self::SterileInsectTechnique => RateRange::new(0.5, 0.9),
        }
    }

    /// Seasonal deployment cost per hectare in dollars.
    #[must_use]
    pub const fn cost_per_hectare(&self) -> f64 {
        match self {
            Self::PheromoneTraps => 120.0,
            Self::MatingDisruption => 350.0,
            Self::Insecticides => 180.0,
            Self::SterileInsectTechnique => 450.0,
        }
    }
}

/// Control-method toggles exactly as the form collaborator submits them.
///
/// At most one method may be active; an empty selection is valid and means
/// the season runs without control pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSelection {
    /// Whether pheromone traps are deployed.
    #[serde(default)]
    pub pheromone_traps: bool,
    /// Whether mating disruption is deployed.
    #[serde(default)]
    pub mating_disruption: bool,
    /// Whether insecticides are deployed.
    #[serde(default)]
    pub insecticides: bool,
    /// Whether the sterile insect technique is deployed.
    #[serde(default)]
    pub sterile_insect_technique: bool,
}

impl ControlSelection {
    /// Selection with no active method.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            pheromone_traps: false,
            mating_disruption: false,
            insecticides: false,
            sterile_insect_technique: false,
        }
    }

    /// Selection with exactly the provided method active.
    #[must_use]
    pub const fn single(method: ControlMethod) -> Self {
        let mut selection = Self::none();
        match method {
            ControlMethod::PheromoneTraps => selection.pheromone_traps = true,
            ControlMethod::MatingDisruption => selection.mating_disruption = true,
            ControlMethod::Insecticides => selection.insecticides = true,
            ControlMethod::SterileInsectTechnique => selection.sterile_insect_technique = true,
        }
        selection
    }

    /// Resolves the toggles into the active method.
    ///
    /// Returns `None` when no method is active and an error when more than
    /// one toggle is set, since the methods are mutually exclusive.
    pub fn active_method(&self) -> Result<Option<ControlMethod>, ConfigError> {
        let flags = [
            (self.pheromone_traps, ControlMethod::PheromoneTraps),
            (self.mating_disruption, ControlMethod::MatingDisruption),
            (self.insecticides, ControlMethod::Insecticides),
            (
                self.sterile_insect_technique,
                ControlMethod::SterileInsectTechnique,
            ),
        ];

        let mut active = None;
        for (enabled, method) in flags {
            if !enabled {
                continue;
            }
            if active.is_some() {
                return Err(ConfigError::ConflictingControlMethods);
            }
            active = Some(method);
        }
        Ok(active)
    }
}

/// Immutable input describing one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Variety planted across the vineyard.
    pub grape_variety: GrapeVariety,
    /// Vineyard area in whole hectares; must be positive.
    pub hectares: u32,
    /// Mean adult pest density per hectare, the Poisson mean of the
    /// establishment draw; must be non-negative and finite.
    pub initial_infestation: f64,
    /// Control-method toggles submitted by the form collaborator.
    #[serde(default)]
    pub control_methods: ControlSelection,
}

impl SimulationConfig {
    /// Creates a configuration from its parts.
    #[must_use]
    pub const fn new(
        grape_variety: GrapeVariety,
        hectares: u32,
        initial_infestation: f64,
        control_methods: ControlSelection,
    ) -> Self {
        Self {
            grape_variety,
            hectares,
            initial_infestation,
            control_methods,
        }
    }

    /// Validates the configuration and resolves the active control method.
    ///
    /// The engine assumes validated input, so this runs before any sampling.
    pub fn validate(&self) -> Result<Option<ControlMethod>, ConfigError> {
        if self.hectares == 0 {
            return Err(ConfigError::ZeroHectares);
        }
        if !self.initial_infestation.is_finite() || self.initial_infestation < 0.0 {
            return Err(ConfigError::InvalidInfestation(self.initial_infestation));
        }
        self.control_methods.active_method()
    }
}

/// Reasons a configuration is rejected before the engine runs.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The vineyard area was zero.
    #[error("vineyard area must cover at least one hectare")]
    ZeroHectares,
    /// The infestation density was negative or not finite.
    #[error("initial infestation must be a non-negative finite density, got {0}")]
    InvalidInfestation(f64),
    /// More than one control method was toggled on.
    #[error("control methods are mutually exclusive; at most one may be active")]
    ConflictingControlMethods,
}

/// Mutable accumulators owned by exactly one run.
///
/// Created fresh per run and discarded afterwards; no two runs ever share a
/// state value. Degree-day accumulation is monotonically non-decreasing and
/// the generation count never exceeds [`GENERATION_LIMIT`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationState {
    gross_yield_kg: f64,
    accumulated_degree_days: f64,
    infestation: bool,
    generations: u8,
    eggs: [f64; GENERATION_LIMIT],
    damage: [f64; GENERATION_LIMIT],
    effectiveness: [f64; GENERATION_LIMIT],
}

impl SimulationState {
    /// Creates a zeroed state for a new run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gross yield of the whole vineyard in kilograms.
    #[must_use]
    pub const fn gross_yield_kg(&self) -> f64 {
        self.gross_yield_kg
    }

    /// Records the gross yield for the run.
    pub fn set_gross_yield_kg(&mut self, kilograms: f64) {
        self.gross_yield_kg = kilograms;
    }

    /// Degree-days accumulated across the growth window so far.
    #[must_use]
    pub const fn accumulated_degree_days(&self) -> f64 {
        self.accumulated_degree_days
    }

    /// Adds to the degree-day total; negative amounts are ignored so the
    /// accumulation stays monotonic.
    pub fn add_degree_days(&mut self, amount: f64) {
        if amount > 0.0 {
            self.accumulated_degree_days += amount;
        }
    }

    /// Whether any adult successfully infested a cluster.
    #[must_use]
    pub const fn infestation_occurred(&self) -> bool {
        self.infestation
    }

    /// Flags the run as infested; the flag never resets within a run.
    pub fn mark_infested(&mut self) {
        self.infestation = true;
    }

    /// Number of generations the season sustains, in `[0, 4]`.
    #[must_use]
    pub const fn generations(&self) -> u8 {
        self.generations
    }

    /// Records the generation count, capped at [`GENERATION_LIMIT`].
    pub fn set_generations(&mut self, count: u8) {
        self.generations = count.min(GENERATION_LIMIT as u8);
    }

    /// Egg total attributed to the provided generation.
    #[must_use]
    pub const fn eggs(&self, generation: Generation) -> f64 {
        self.eggs[generation.index()]
    }

    /// Adds eggs to the provided generation's total.
    pub fn add_eggs(&mut self, generation: Generation, quantity: f64) {
        self.eggs[generation.index()] += quantity;
    }

    /// Overwrites the provided generation's egg total.
    pub fn set_eggs(&mut self, generation: Generation, quantity: f64) {
        self.eggs[generation.index()] = quantity;
    }

    /// Fruit damage in kilograms caused by the provided generation.
    #[must_use]
    pub const fn damage(&self, generation: Generation) -> f64 {
        self.damage[generation.index()]
    }

    /// Records the provided generation's damage total.
    pub fn record_damage(&mut self, generation: Generation, kilograms: f64) {
        self.damage[generation.index()] = kilograms;
    }

    /// Control effectiveness drawn for the provided generation, in `[0, 1]`.
    #[must_use]
    pub const fn effectiveness(&self, generation: Generation) -> f64 {
        self.effectiveness[generation.index()]
    }

    /// Records the effectiveness drawn for the provided generation.
    pub fn record_effectiveness(&mut self, generation: Generation, value: f64) {
        self.effectiveness[generation.index()] = value;
    }

    /// Sum of damage across all generations reached.
    #[must_use]
    pub fn total_damage(&self) -> f64 {
        self.damage.iter().sum()
    }
}

/// Economic comparison of the selected control strategy against inaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicImpact {
    /// Estimated dollar loss had no control been applied.
    pub loss_without_control: f64,
    /// Dollar value of the damage realized under the applied control.
    pub loss_with_control: f64,
    /// Total seasonal cost of the applied control method.
    pub control_costs: f64,
    /// Seasonal control cost per hectare.
    pub cost_per_hectare: f64,
    /// Avoided loss minus control costs.
    pub net_benefit: f64,
    /// Avoided loss per dollar of control spending; zero without spending.
    pub return_on_investment: f64,
}

/// Immutable outcome of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Variety the run was configured with.
    pub grape_variety: GrapeVariety,
    /// Control method that was active, if any.
    pub control_method: Option<ControlMethod>,
    /// Net harvestable yield per hectare in kilograms, floored to a whole
    /// kilogram.
    pub yield_per_hectare: f64,
    /// Undamaged baseline yield per hectare in kilograms.
    pub base_yield_per_hectare: f64,
    /// Yield loss versus the baseline as a percentage in `[0, 100]`.
    pub yield_loss_percent: f64,
    /// Per-generation share of the baseline yield lost, as percentages
    /// rounded to two decimals.
    pub generation_impact: [f64; GENERATION_LIMIT],
    /// Control effectiveness drawn per generation, as percentages rounded
    /// to one decimal.
    pub control_effectiveness: [f64; GENERATION_LIMIT],
    /// Ordered recommendation strings for the reporting collaborator.
    pub recommendations: Vec<String>,
    /// Economic breakdown of the applied strategy.
    pub economic_impact: EconomicImpact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = SimulationConfig::new(
            GrapeVariety::Malbec,
            12,
            0.2,
            ControlSelection::single(ControlMethod::MatingDisruption),
        );
        assert_round_trip(&config);
    }

    #[test]
    fn economic_impact_round_trips_through_bincode() {
        let impact = EconomicImpact {
            loss_without_control: 1_250.0,
            loss_with_control: 310.0,
            control_costs: 350.0,
            cost_per_hectare: 350.0,
            net_benefit: 590.0,
            return_on_investment: 2.69,
        };
        assert_round_trip(&impact);
    }

    #[test]
    fn growth_windows_cover_the_expected_months() {
        let malbec = GrapeVariety::Malbec.profile();
        let torrontes = GrapeVariety::Torrontes.profile();
        assert_eq!(malbec.growth_window().len(), 7);
        assert_eq!(torrontes.growth_window().len(), 6);
        assert_eq!(malbec.growth_window().last(), Some(&Month::March));
        assert_eq!(torrontes.growth_window().last(), Some(&Month::February));
    }

    #[test]
    fn damage_means_follow_the_generation_ordinals() {
        let profile = GrapeVariety::Torrontes.profile();
        assert_eq!(profile.damage_per_larva(Generation::First), 0.01);
        assert_eq!(profile.damage_per_larva(Generation::Second), 0.04);
        assert_eq!(profile.damage_per_larva(Generation::Third), 0.08);
        assert_eq!(profile.damage_per_larva(Generation::Fourth), 0.015);
    }

    #[test]
    fn effectiveness_ranges_stay_within_unit_interval() {
        for method in [
            ControlMethod::PheromoneTraps,
            ControlMethod::MatingDisruption,
            ControlMethod::Insecticides,
            ControlMethod::SterileInsectTechnique,
        ] {
            let range = method.effectiveness();
            assert!(range.min() >= 0.0 && range.max() <= 1.0);
            assert!(range.min() <= range.max());
        }
    }

    #[test]
    fn empty_selection_resolves_to_no_control() {
        let selection = ControlSelection::none();
        assert_eq!(selection.active_method(), Ok(None));
    }

    #[test]
    fn conflicting_selection_is_rejected() {
        let selection = ControlSelection {
            insecticides: true,
            pheromone_traps: true,
            ..ControlSelection::none()
        };
        assert_eq!(
            selection.active_method(),
            Err(ConfigError::ConflictingControlMethods)
        );
    }

    #[test]
    fn validation_rejects_zero_hectares() {
        let config =
            SimulationConfig::new(GrapeVariety::Malbec, 0, 0.2, ControlSelection::none());
        assert_eq!(config.validate(), Err(ConfigError::ZeroHectares));
    }

    #[test]
    fn validation_rejects_negative_infestation() {
        let config =
            SimulationConfig::new(GrapeVariety::Malbec, 1, -0.5, ControlSelection::none());
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidInfestation(-0.5))
        );
    }

    #[test]
    fn state_caps_generation_count() {
        let mut state = SimulationState::new();
        state.set_generations(9);
        assert_eq!(state.generations(), GENERATION_LIMIT as u8);
    }

    #[test]
    fn state_ignores_negative_degree_days() {
        let mut state = SimulationState::new();
        state.add_degree_days(42.0);
        state.add_degree_days(-10.0);
        assert_eq!(state.accumulated_degree_days(), 42.0);
    }

    #[test]
    fn total_damage_sums_every_generation() {
        let mut state = SimulationState::new();
        state.record_damage(Generation::First, 12.0);
        state.record_damage(Generation::Third, 30.0);
        assert_eq!(state.total_damage(), 42.0);
    }
}
