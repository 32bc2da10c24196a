#![deny(warnings)]

//! Reallocation scenario model: redistribute export volume away from the
//! China/Asia channel under a demand-reduction scenario.
//!
//! The withdrawn allocation share is capped by an optional contractual floor
//! and redistributed to the remaining regions in fixed fractions, preserving
//! the total allocation. A 12-week price-impact sweep per region and an
//! exponential recovery curve for Europe accompany the plan.

use scen_core::{validate_scenario_input, Region, ScenarioInput, Timeframe};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Baseline China/Asia allocation share, percent of total.
pub const CHINA_BASE_ALLOCATION: f64 = 45.0;
/// Fraction of the China/Asia baseline protected by minimum contracts.
pub const MIN_CONTRACT_FRACTION: f64 = 0.6;
/// Projection horizon for the price-impact sweep, weeks.
const HORIZON_WEEKS: u32 = 12;
/// Time constant of the Europe price recovery curve, weeks.
const RECOVERY_HALF_WEEKS: f64 = 8.0;

/// Errors produced by the reallocation model.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    /// Control input failed boundary validation.
    #[error(transparent)]
    Invalid(#[from] scen_core::ValidationError),
}

/// Baseline allocation share per region, percent of total. Sums to 100.
pub fn base_allocation(region: Region) -> f64 {
    match region {
        Region::ChinaAsia => CHINA_BASE_ALLOCATION,
        Region::SoutheastAsia => 5.0,
        Region::Europe => 25.0,
        Region::Usa => 15.0,
        Region::MiddleEast => 10.0,
    }
}

/// Fraction of the withdrawn China/Asia volume each receiving region absorbs.
/// Sums to 1 over the receivers; zero for China/Asia itself.
fn redistribution_share(region: Region) -> f64 {
    match region {
        Region::ChinaAsia => 0.0,
        Region::SoutheastAsia => 0.40,
        Region::Europe => 0.30,
        Region::Usa => 0.20,
        Region::MiddleEast => 0.10,
    }
}

/// Reference price per region, currency units per tonne.
fn regional_price(region: Region) -> f64 {
    match region {
        Region::ChinaAsia => 2450.0,
        Region::SoutheastAsia => 2250.0,
        Region::Europe => 2300.0,
        Region::Usa => 2600.0,
        Region::MiddleEast => 2700.0,
    }
}

/// Margin rate per region on redirected volume.
fn regional_margin_rate(region: Region) -> f64 {
    match region {
        Region::ChinaAsia => 0.15,
        Region::SoutheastAsia => 0.12,
        Region::Europe => 0.18,
        Region::Usa => 0.22,
        Region::MiddleEast => 0.25,
    }
}

/// Linear price-impact coefficient per region, percent change per allocation
/// point moved. Positive for China/Asia (withdrawal firms the price);
/// receivers soften proportionally to their redistribution share.
fn impact_coefficient(region: Region) -> f64 {
    match region {
        Region::ChinaAsia => 0.50,
        Region::SoutheastAsia => -0.40,
        Region::Europe => -0.30,
        Region::Usa => -0.20,
        Region::MiddleEast => -0.10,
    }
}

/// One row of the reallocation plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecommendation {
    pub region: Region,
    /// Baseline allocation share, percent.
    pub current_allocation_pct: f64,
    /// Share after the scenario reallocation, percent.
    pub recommended_allocation_pct: f64,
    /// Narrative for the plan table.
    pub rationale: String,
    /// Weekly return delta from the move, thousands of currency units.
    pub expected_return_k_eur_per_week: f64,
}

/// One cell of the 12-week × 5-region price-impact sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionPriceRow {
    pub region: Region,
    /// Week index, 1-based.
    pub week: u32,
    /// Reference price before the scenario, currency units per tonne.
    pub base_price: f64,
    /// Price under the scenario at that week, currency units per tonne.
    pub scenario_price: f64,
    /// Recovery trajectory; carried for Europe only.
    pub recovery_price: Option<f64>,
}

/// Full scenario output: plan rows, price sweep, and aggregate return.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPlan {
    pub recommendations: Vec<AllocationRecommendation>,
    pub price_impact_by_region: Vec<RegionPriceRow>,
    /// Sum of per-region weekly return deltas, thousands of currency units.
    pub total_expected_return: f64,
    /// Allocation share actually withdrawn from China/Asia, percent points.
    pub actual_reduction_pct_points: f64,
}

/// Fraction of the scenario's price impact in force at a given week.
fn impact_factor(timeframe: Timeframe, week: u32) -> f64 {
    match timeframe {
        Timeframe::Immediate => 1.0,
        Timeframe::Gradual => f64::from(week) / f64::from(HORIZON_WEEKS),
        Timeframe::Planned => 0.5,
    }
}

fn rationale_for(region: Region, delta: f64, input: &ScenarioInput) -> String {
    match region {
        Region::ChinaAsia => format!(
            "Scale back by {:.1} pp in line with the {:?} response strategy",
            -delta, input.response_strategy
        ),
        _ => format!(
            "Absorb {:.1} pp of redirected volume at local margin rates",
            delta
        ),
    }
}

/// Compute the reallocation plan for a China/Asia demand-reduction scenario.
pub fn compute_scenario(input: &ScenarioInput) -> Result<ScenarioPlan, ScenarioError> {
    validate_scenario_input(input)?;

    let china_reduction = input.reduction_percentage / 100.0 * CHINA_BASE_ALLOCATION;
    let floor = if input.respect_min_contracts {
        CHINA_BASE_ALLOCATION * MIN_CONTRACT_FRACTION
    } else {
        0.0
    };
    // The withdrawal never takes China/Asia below its contractual floor.
    let actual_reduction = china_reduction.min(CHINA_BASE_ALLOCATION - floor);

    let mut recommendations = Vec::with_capacity(Region::ALL.len());
    let mut total_expected_return = 0.0;
    for region in Region::ALL {
        let delta = if region == Region::ChinaAsia {
            -actual_reduction
        } else {
            redistribution_share(region) * actual_reduction
        };
        let expected_return =
            delta * regional_price(region) * regional_margin_rate(region) / 1000.0;
        total_expected_return += expected_return;
        recommendations.push(AllocationRecommendation {
            region,
            current_allocation_pct: base_allocation(region),
            recommended_allocation_pct: base_allocation(region) + delta,
            rationale: rationale_for(region, delta, input),
            expected_return_k_eur_per_week: expected_return,
        });
    }

    let price_impact_by_region = price_impact_rows(actual_reduction, input.timeframe);
    debug!(
        reduction = input.reduction_percentage,
        actual_reduction,
        total_expected_return,
        "scenario plan computed"
    );

    Ok(ScenarioPlan {
        recommendations,
        price_impact_by_region,
        total_expected_return,
        actual_reduction_pct_points: actual_reduction,
    })
}

/// 12-week × 5-region price sweep for a given withdrawn allocation share.
fn price_impact_rows(actual_reduction: f64, timeframe: Timeframe) -> Vec<RegionPriceRow> {
    let mut rows = Vec::with_capacity(Region::ALL.len() * HORIZON_WEEKS as usize);
    for region in Region::ALL {
        let base_price = regional_price(region);
        for week in 1..=HORIZON_WEEKS {
            let factor = impact_factor(timeframe, week);
            let shift = impact_coefficient(region) * actual_reduction / 100.0 * factor;
            let scenario_price = base_price * (1.0 + shift);
            let recovery_price = (region == Region::Europe).then(|| {
                base_price
                    - (base_price - scenario_price) * (-f64::from(week) / RECOVERY_HALF_WEEKS).exp()
            });
            rows.push(RegionPriceRow {
                region,
                week,
                base_price,
                scenario_price,
                recovery_price,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scen_core::ResponseStrategy;

    fn input(reduction: f64, respect: bool, timeframe: Timeframe) -> ScenarioInput {
        ScenarioInput {
            reduction_percentage: reduction,
            timeframe,
            response_strategy: ResponseStrategy::Diversification,
            respect_min_contracts: respect,
        }
    }

    fn row(plan: &ScenarioPlan, region: Region) -> &AllocationRecommendation {
        plan.recommendations
            .iter()
            .find(|r| r.region == region)
            .unwrap()
    }

    #[test]
    fn thirty_percent_without_floor() {
        let plan = compute_scenario(&input(30.0, false, Timeframe::Immediate)).unwrap();
        // 30% of the 45 pp baseline = 13.5 pp withdrawn.
        assert!((plan.actual_reduction_pct_points - 13.5).abs() < 1e-9);
        assert!(
            (row(&plan, Region::ChinaAsia).recommended_allocation_pct - 31.5).abs() < 1e-9
        );
        assert!((row(&plan, Region::Europe).recommended_allocation_pct - 29.05).abs() < 1e-9);
        assert!(
            (row(&plan, Region::SoutheastAsia).recommended_allocation_pct - 10.4).abs() < 1e-9
        );
    }

    #[test]
    fn floor_caps_the_withdrawal() {
        let plan = compute_scenario(&input(60.0, true, Timeframe::Immediate)).unwrap();
        // Naive withdrawal would be 27 pp; the 45 * 0.6 = 27 floor caps it at 18.
        assert!((plan.actual_reduction_pct_points - 18.0).abs() < 1e-9);
        assert!((row(&plan, Region::ChinaAsia).recommended_allocation_pct - 27.0).abs() < 1e-9);
    }

    #[test]
    fn no_floor_when_flag_is_off() {
        let plan = compute_scenario(&input(60.0, false, Timeframe::Immediate)).unwrap();
        assert!((plan.actual_reduction_pct_points - 27.0).abs() < 1e-9);
        assert!((row(&plan, Region::ChinaAsia).recommended_allocation_pct - 18.0).abs() < 1e-9);
    }

    #[test]
    fn expected_returns_use_regional_economics() {
        let plan = compute_scenario(&input(30.0, false, Timeframe::Immediate)).unwrap();
        let china = row(&plan, Region::ChinaAsia);
        // -13.5 * 2450 * 0.15 / 1000
        assert!((china.expected_return_k_eur_per_week - (-4.96125)).abs() < 1e-9);
        let europe = row(&plan, Region::Europe);
        // 4.05 * 2300 * 0.18 / 1000
        assert!((europe.expected_return_k_eur_per_week - 1.6767).abs() < 1e-9);
        let total: f64 = plan
            .recommendations
            .iter()
            .map(|r| r.expected_return_k_eur_per_week)
            .sum();
        assert!((plan.total_expected_return - total).abs() < 1e-12);
    }

    #[test]
    fn sweep_has_sixty_rows_and_europe_recovery() {
        let plan = compute_scenario(&input(30.0, false, Timeframe::Immediate)).unwrap();
        assert_eq!(plan.price_impact_by_region.len(), 60);
        for cell in &plan.price_impact_by_region {
            assert_eq!(cell.recovery_price.is_some(), cell.region == Region::Europe);
        }
        // Recovery pulls the Europe price back toward baseline over time.
        let europe: Vec<_> = plan
            .price_impact_by_region
            .iter()
            .filter(|c| c.region == Region::Europe)
            .collect();
        let early = europe[0];
        let late = europe[11];
        let early_gap = (early.base_price - early.recovery_price.unwrap()).abs();
        let late_gap = (late.base_price - late.recovery_price.unwrap()).abs();
        assert!(late_gap < early_gap);
    }

    #[test]
    fn gradual_timeframe_phases_impact_in() {
        let plan = compute_scenario(&input(30.0, false, Timeframe::Gradual)).unwrap();
        let china: Vec<_> = plan
            .price_impact_by_region
            .iter()
            .filter(|c| c.region == Region::ChinaAsia)
            .collect();
        // Withdrawal firms the China price, more so as the phase-in completes.
        assert!(china[0].scenario_price > china[0].base_price);
        for pair in china.windows(2) {
            assert!(pair[1].scenario_price >= pair[0].scenario_price);
        }
        let immediate = compute_scenario(&input(30.0, false, Timeframe::Immediate)).unwrap();
        let china_now = immediate
            .price_impact_by_region
            .iter()
            .find(|c| c.region == Region::ChinaAsia && c.week == 12)
            .unwrap();
        // Week 12 of a gradual phase-in matches the immediate impact.
        assert!((china[11].scenario_price - china_now.scenario_price).abs() < 1e-9);
    }

    #[test]
    fn planned_timeframe_halves_impact() {
        let planned = compute_scenario(&input(30.0, false, Timeframe::Planned)).unwrap();
        let immediate = compute_scenario(&input(30.0, false, Timeframe::Immediate)).unwrap();
        let shift = |plan: &ScenarioPlan| {
            let c = plan
                .price_impact_by_region
                .iter()
                .find(|c| c.region == Region::Usa && c.week == 6)
                .unwrap();
            c.scenario_price - c.base_price
        };
        assert!((shift(&planned) * 2.0 - shift(&immediate)).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_reduction_rejected() {
        assert!(compute_scenario(&input(9.9, false, Timeframe::Immediate)).is_err());
        assert!(compute_scenario(&input(60.1, true, Timeframe::Immediate)).is_err());
    }

    proptest! {
        #[test]
        fn allocation_is_conserved(
            reduction in 10.0f64..=60.0,
            respect in proptest::bool::ANY,
        ) {
            let plan = compute_scenario(
                &input(reduction, respect, Timeframe::Immediate)).unwrap();
            let total: f64 = plan
                .recommendations
                .iter()
                .map(|r| r.recommended_allocation_pct)
                .sum();
            prop_assert!((total - 100.0).abs() < 1e-9);
        }

        #[test]
        fn china_never_below_floor_when_respected(reduction in 10.0f64..=60.0) {
            let plan = compute_scenario(
                &input(reduction, true, Timeframe::Immediate)).unwrap();
            let china = plan
                .recommendations
                .iter()
                .find(|r| r.region == Region::ChinaAsia)
                .unwrap();
            prop_assert!(china.recommended_allocation_pct >= 27.0 - 1e-9);
        }

        #[test]
        fn receivers_split_matches_withdrawal(
            reduction in 10.0f64..=60.0,
            respect in proptest::bool::ANY,
        ) {
            let plan = compute_scenario(
                &input(reduction, respect, Timeframe::Immediate)).unwrap();
            let withdrawn = plan.actual_reduction_pct_points;
            let gained: f64 = plan
                .recommendations
                .iter()
                .filter(|r| r.region != Region::ChinaAsia)
                .map(|r| r.recommended_allocation_pct - base_allocation(r.region))
                .sum();
            prop_assert!((gained - withdrawn).abs() < 1e-9);
        }
    }
}
