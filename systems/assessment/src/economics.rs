//! Economic comparison of the applied control strategy against inaction.

use vinemoth_core::{
    ControlMethod, EconomicImpact, Generation, SimulationState, VarietyProfile,
    BASE_YIELD_KG_PER_HECTARE,
};

/// Floor applied to the per-generation survival factor when estimating the
/// uncontrolled counterfactual, keeping the estimate finite at full
/// effectiveness.
const MIN_SURVIVAL_FACTOR: f64 = 0.01;

/// Values the realized damage and the uncontrolled counterfactual in
/// dollars and nets them against the control spending.
///
/// Damage kilograms are priced at the variety's per-hectare crop value
/// prorated over the baseline yield. The counterfactual rescales each
/// generation's damage by the compounded control survival factors, an
/// estimate that leans on the population chain being linear in its egg
/// counts. Return on investment is zero when nothing was spent.
#[must_use]
pub fn economic_impact(
    hectares: u32,
    method: Option<ControlMethod>,
    profile: &VarietyProfile,
    state: &SimulationState,
) -> EconomicImpact {
    let price_per_kg = profile.crop_value_per_hectare() / BASE_YIELD_KG_PER_HECTARE;

    let loss_with_control = state.total_damage() * price_per_kg;

    let mut uncontrolled_damage = 0.0;
    let mut compounded_survival = 1.0;
    for generation in Generation::ALL {
        if generation.ordinal() > state.generations() {
            break;
        }
        let survival = (1.0 - state.effectiveness(generation)).max(MIN_SURVIVAL_FACTOR);
        compounded_survival *= survival;
        uncontrolled_damage += state.damage(generation) / compounded_survival;
    }
    let loss_without_control = uncontrolled_damage * price_per_kg;

    let cost_per_hectare = method.map_or(0.0, |m| m.cost_per_hectare());
    let control_costs = cost_per_hectare * f64::from(hectares);

    let avoided = loss_without_control - loss_with_control;
    let net_benefit = avoided - control_costs;
    let return_on_investment = if control_costs > 0.0 {
        avoided / control_costs
    } else {
        0.0
    };

    EconomicImpact {
        loss_without_control,
        loss_with_control,
        control_costs,
        cost_per_hectare,
        net_benefit,
        return_on_investment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vinemoth_core::GrapeVariety;

    fn infested_state(damage: [f64; 4], effectiveness: [f64; 4], generations: u8) -> SimulationState {
        let mut state = SimulationState::new();
        state.mark_infested();
        state.set_generations(generations);
        for generation in Generation::ALL {
            state.record_damage(generation, damage[generation.index()]);
            state.record_effectiveness(generation, effectiveness[generation.index()]);
        }
        state
    }

    #[test]
    fn no_control_spends_and_avoids_nothing() {
        let state = infested_state([500.0, 0.0, 0.0, 0.0], [0.0; 4], 1);
        let profile = GrapeVariety::Malbec.profile();
        let impact = economic_impact(10, None, &profile, &state);
        assert_eq!(impact.control_costs, 0.0);
        assert_eq!(impact.cost_per_hectare, 0.0);
        assert_eq!(impact.return_on_investment, 0.0);
        // Zero effectiveness means the counterfactual equals the realized loss.
        assert_relative_eq!(
            impact.loss_without_control,
            impact.loss_with_control,
            epsilon = 1e-9
        );
        assert_relative_eq!(impact.net_benefit, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn counterfactual_rescales_by_compounded_survival() {
        // One generation at 50% effectiveness: the uncontrolled estimate
        // doubles the realized damage.
        let state = infested_state([100.0, 0.0, 0.0, 0.0], [0.5, 0.0, 0.0, 0.0], 1);
        let profile = GrapeVariety::Malbec.profile();
        let impact = economic_impact(1, Some(ControlMethod::SterileInsectTechnique), &profile, &state);
        let price = profile.crop_value_per_hectare() / BASE_YIELD_KG_PER_HECTARE;
        assert_relative_eq!(impact.loss_with_control, 100.0 * price, epsilon = 1e-9);
        assert_relative_eq!(impact.loss_without_control, 200.0 * price, epsilon = 1e-9);
    }

    #[test]
    fn full_effectiveness_keeps_the_estimate_finite() {
        let state = infested_state([10.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0], 1);
        let profile = GrapeVariety::Torrontes.profile();
        let impact = economic_impact(1, Some(ControlMethod::MatingDisruption), &profile, &state);
        assert!(impact.loss_without_control.is_finite());
        assert!(impact.loss_without_control > impact.loss_with_control);
    }

    #[test]
    fn costs_scale_with_the_area() {
        let state = SimulationState::new();
        let profile = GrapeVariety::Malbec.profile();
        let impact = economic_impact(12, Some(ControlMethod::MatingDisruption), &profile, &state);
        assert_eq!(impact.cost_per_hectare, 350.0);
        assert_eq!(impact.control_costs, 4_200.0);
        // Nothing was lost either way, so the spending is the whole deficit.
        assert_relative_eq!(impact.net_benefit, -4_200.0, epsilon = 1e-9);
    }

    #[test]
    fn net_benefit_follows_the_identity() {
        let state = infested_state(
            [200.0, 300.0, 0.0, 0.0],
            [0.25, 0.4, 0.0, 0.0],
            2,
        );
        let profile = GrapeVariety::Malbec.profile();
        let impact = economic_impact(2, Some(ControlMethod::PheromoneTraps), &profile, &state);
        assert_relative_eq!(
            impact.net_benefit,
            (impact.loss_without_control - impact.loss_with_control) - impact.control_costs,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            impact.return_on_investment,
            (impact.loss_without_control - impact.loss_with_control) / impact.control_costs,
            epsilon = 1e-9
        );
    }
}
