//! Plain-text rendering of a simulation result.

use vinemoth_core::{Generation, SimulationResult};

/// Renders the result as the human-readable season report.
pub(crate) fn render(result: &SimulationResult) -> String {
    let mut out = String::new();

    out.push_str("Vineyard moth season report\n");
    out.push_str("===========================\n");
    out.push_str(&format!(
        "Variety:             {}\n",
        result.grape_variety.display_name()
    ));
    out.push_str(&format!(
        "Control method:      {}\n",
        result
            .control_method
            .map_or("none", |method| method.display_name())
    ));
    out.push_str(&format!(
        "Base yield:          {:.0} kg/ha\n",
        result.base_yield_per_hectare
    ));
    out.push_str(&format!(
        "Net yield:           {:.0} kg/ha\n",
        result.yield_per_hectare
    ));
    out.push_str(&format!(
        "Yield loss:          {:.1}%\n",
        result.yield_loss_percent
    ));

    out.push_str("\nPer-generation breakdown\n");
    for generation in Generation::ALL {
        out.push_str(&format!(
            "  generation {}: impact {:.2}%, control effectiveness {:.1}%\n",
            generation.ordinal(),
            result.generation_impact[generation.index()],
            result.control_effectiveness[generation.index()],
        ));
    }

    let economics = &result.economic_impact;
    out.push_str("\nEconomic impact\n");
    out.push_str(&format!(
        "  projected loss without control: ${:.2}\n",
        economics.loss_without_control
    ));
    out.push_str(&format!(
        "  realized loss with control:     ${:.2}\n",
        economics.loss_with_control
    ));
    out.push_str(&format!(
        "  control costs:                  ${:.2} (${:.2}/ha)\n",
        economics.control_costs, economics.cost_per_hectare
    ));
    out.push_str(&format!(
        "  net benefit:                    ${:.2}\n",
        economics.net_benefit
    ));
    out.push_str(&format!(
        "  return on investment:           {:.2}\n",
        economics.return_on_investment
    ));

    out.push_str("\nRecommendations\n");
    for (index, recommendation) in result.recommendations.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, recommendation));
    }

    out
}
