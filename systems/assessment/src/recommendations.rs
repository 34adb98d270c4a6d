//! Threshold-driven recommendation strings for the reporting collaborator.

use vinemoth_core::{ControlMethod, Generation, GrapeVariety, GENERATION_LIMIT};

/// Builds the ordered recommendation list for one finished run.
///
/// A loss under ten percent yields a single reassurance message and nothing
/// else. Otherwise the list opens with a severity message, continues with a
/// message for the generation carrying the largest impact when that impact
/// exceeds ten percent, and closes with advice keyed to the active control
/// method.
#[must_use]
pub fn recommendations(
    variety: GrapeVariety,
    method: Option<ControlMethod>,
    yield_loss_percent: f64,
    generation_impact: &[f64; GENERATION_LIMIT],
) -> Vec<String> {
    let variety_name = variety.display_name();
    let mut messages = Vec::new();

    if yield_loss_percent < 10.0 {
        messages.push(format!(
            "The projected yield loss ({yield_loss_percent:.1}%) is acceptable and does not \
             require intensifying or changing the current control program. Keep up regular \
             monitoring to detect shifts in the pest population."
        ));
        return messages;
    }

    if yield_loss_percent > 40.0 {
        messages.push(format!(
            "Urgently implement an integrated control program for {variety_name}. The \
             projected yield loss ({yield_loss_percent:.1}%) requires immediate action."
        ));
    } else if yield_loss_percent > 20.0 {
        messages.push(format!(
            "Apply a moderate control program for {variety_name}. The projected yield loss \
             ({yield_loss_percent:.1}%) can be reduced significantly with a well-chosen \
             control method."
        ));
    } else {
        messages.push(format!(
            "Maintain a regular monitoring program for {variety_name}. The projected yield \
             loss ({yield_loss_percent:.1}%) is manageable with minimal intervention."
        ));
    }

    let maximum = generation_impact
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    for generation in Generation::ALL {
        let impact = generation_impact[generation.index()];
        if impact == maximum && impact > 10.0 {
            messages.push(generation_message(generation).to_owned());
        }
    }

    if let Some(method) = method {
        messages.push(method_message(method, variety_name));
    }

    messages
}

fn generation_message(generation: Generation) -> &'static str {
    match generation {
        Generation::First => {
            "Prioritize early control during flowering (first generation) with intensive \
             monitoring traps and preventive Bacillus thuringiensis applications, which are \
             effective against young larvae without affecting quality."
        }
        Generation::Second => {
            "Focus on the second generation (fruit set) by deploying mating disruption \
             before adults emerge and timing specific insecticide applications to the \
             monitored flight peaks."
        }
        Generation::Third => {
            "Control the third generation (veraison to ripening) with mating disruption \
             complemented by products compatible with the approaching harvest, and consider \
             advancing the harvest if damage is severe."
        }
        Generation::Fourth => {
            "Target the fourth generation (late ripening) with a combination of mating \
             disruption and low-impact applications, prioritizing protection of the final \
             wine quality."
        }
    }
}

fn method_message(method: ControlMethod, variety_name: &str) -> String {
    match method {
        ControlMethod::PheromoneTraps => {
            "Optimize the pheromone-trap deployment by installing one trap every three to \
             five hectares to detect flight peaks and time interventions."
                .to_owned()
        }
        ControlMethod::MatingDisruption => format!(
            "Keep mating disruption as the primary control method. It is highly effective \
             and compatible with organic production, especially for {variety_name}."
        ),
        ControlMethod::Insecticides => {
            "Use insecticides specific to the vine moth, applying them at the optimal moment \
             according to flight monitoring and respecting pre-harvest intervals."
                .to_owned()
        }
        ControlMethod::SterileInsectTechnique => {
            "Release sterile males at strategic moments to suppress the pest population \
             sustainably through the sterile insect technique."
                .to_owned()
        }
    }
}
