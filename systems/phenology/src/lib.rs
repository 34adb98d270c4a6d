#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Degree-day accumulation across a variety's growth window.
//!
//! One simulated daily temperature is drawn per calendar day; only the
//! excess above the developmental threshold counts. The season total gates
//! how many pest generations the downstream simulator can run.

use vinemoth_core::{Month, DEVELOPMENT_THRESHOLD_CELSIUS};
use vinemoth_system_sampling::{Samplers, UniformSource};

/// Degree-days accumulated within a single month.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthlyDegreeDays {
    /// Month the accumulation belongs to.
    pub month: Month,
    /// Thermal excess accumulated over the month, in degree-days.
    pub degree_days: f64,
}

/// Per-month breakdown and season total of accumulated degree-days.
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonDegreeDays {
    monthly: Vec<MonthlyDegreeDays>,
    total: f64,
}

impl SeasonDegreeDays {
    /// Monthly accumulations in growth-window order.
    #[must_use]
    pub fn monthly(&self) -> &[MonthlyDegreeDays] {
        &self.monthly
    }

    /// Season total in degree-days; never negative.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }
}

/// Accumulates degree-days over every day of every month in the window.
///
/// Each day draws one simulated temperature from the month's climate
/// normals; days at or below the threshold contribute nothing, so the
/// running total is monotonically non-decreasing.
pub fn accumulate_season<S: UniformSource>(
    window: &[Month],
    samplers: &mut Samplers<S>,
) -> SeasonDegreeDays {
    let mut monthly = Vec::with_capacity(window.len());
    let mut total = 0.0;

    for &month in window {
        let normals = month.climate();
        let mut accumulated = 0.0;
        for _ in 0..month.days() {
            let temperature =
                samplers.normal(normals.mean_temperature(), normals.deviation());
            if temperature > DEVELOPMENT_THRESHOLD_CELSIUS {
                accumulated += temperature - DEVELOPMENT_THRESHOLD_CELSIUS;
            }
        }
        monthly.push(MonthlyDegreeDays {
            month,
            degree_days: accumulated,
        });
        total += accumulated;
    }

    SeasonDegreeDays { monthly, total }
}
