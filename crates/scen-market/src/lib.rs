#![deny(warnings)]

//! Market impact model: weekly price/utilisation trajectory for a proposed
//! volume injection, with tipping point detection.
//!
//! The model ramps the injected volume linearly over the first four weeks,
//! holds it flat for the rest of the 12-week horizon, and applies a quadratic
//! price penalty once market utilisation passes the tipping threshold.

use scen_core::{validate_market_input, MarketImpactInput, RiskLevel, TargetMarket};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Baseline weekly volume already flowing to the target market, tonnes.
pub const CURRENT_MARKET_VOLUME: f64 = 1200.0;
/// Weekly absorption capacity of the target market, tonnes.
pub const MARKET_CAPACITY: f64 = 1800.0;
/// Reference butter price, currency units per tonne.
pub const CURRENT_PRICE: f64 = 4000.0;
/// Utilisation above which price pressure sets in.
pub const TIPPING_UTILISATION: f64 = 0.85;

/// Width of the utilisation band from the tipping point to full capacity.
const PRESSURE_BAND: f64 = 0.15;
/// Price pressure at full capacity.
const PRESSURE_AT_CAPACITY: f64 = 0.35;
/// Projection horizon, weeks.
const HORIZON_WEEKS: u32 = 12;
/// Weeks over which the injected volume phases in.
const RAMP_WEEKS: f64 = 4.0;

/// Errors produced by the market impact model.
#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    /// Control input failed boundary validation.
    #[error(transparent)]
    Invalid(#[from] scen_core::ValidationError),
    /// Steady-state volume must be strictly positive for buffer figures.
    #[error("planned weekly volume {0} tonnes is not positive")]
    NonPositivePlannedVolume(f64),
}

/// One week of the projected trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProjection {
    /// Week index, 1-based.
    pub week: u32,
    /// Total volume flowing to the market that week, tonnes.
    pub tonnes: f64,
    /// Pressure-adjusted price, currency units per tonne.
    pub price: f64,
    /// Volume as a fraction of market capacity.
    pub utilisation: f64,
    /// Step-function classification of `utilisation`.
    pub risk_level: RiskLevel,
    /// True once utilisation exceeds the tipping threshold.
    pub is_tipping_point: bool,
}

/// Full model output: 12-week trajectory plus steady-state summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketImpact {
    /// Market the injection targets, echoed for the rendering sink.
    pub target_market: TargetMarket,
    /// Week-by-week trajectory, always 12 rows.
    pub weekly_projections: Vec<WeeklyProjection>,
    /// Volume at which the market tips, tonnes per week.
    pub tipping_threshold: f64,
    /// Steady-state weekly volume once the ramp completes, tonnes.
    pub planned_weekly_volume: f64,
    /// Headroom between the plan and the tipping threshold, tonnes.
    pub buffer_to_tipping: f64,
    /// Headroom as a percentage of the planned volume.
    pub buffer_percentage: f64,
    /// Risk classification of the steady-state utilisation.
    pub current_risk_level: RiskLevel,
}

/// Risk classification as a step function of utilisation.
pub fn classify_utilisation(utilisation: f64) -> RiskLevel {
    if utilisation > 0.85 {
        RiskLevel::Critical
    } else if utilisation > 0.75 {
        RiskLevel::High
    } else if utilisation > 0.65 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Price pressure for a given utilisation.
///
/// Zero at or below the tipping utilisation; above it the penalty grows
/// quadratically, reaching `PRESSURE_AT_CAPACITY` at 100% utilisation.
pub fn price_pressure(utilisation: f64) -> f64 {
    if utilisation <= TIPPING_UTILISATION {
        return 0.0;
    }
    let overshoot = (utilisation - TIPPING_UTILISATION) / PRESSURE_BAND;
    overshoot * overshoot * PRESSURE_AT_CAPACITY
}

/// Fraction of the injected volume phased in by `week`.
fn ramp_factor(week: u32) -> f64 {
    (f64::from(week) / RAMP_WEEKS).min(1.0)
}

/// Compute the 12-week market impact of a proposed volume injection.
///
/// Negative injections (withdrawals) are legal: utilisation drops, pressure
/// stays zero, and the price holds at the baseline.
pub fn compute_market_impact(input: &MarketImpactInput) -> Result<MarketImpact, MarketError> {
    validate_market_input(input)?;
    let additional = input.additional_volume_tonnes_per_week;

    let planned_weekly_volume = CURRENT_MARKET_VOLUME + additional;
    if planned_weekly_volume <= 0.0 {
        return Err(MarketError::NonPositivePlannedVolume(planned_weekly_volume));
    }

    let mut weekly_projections = Vec::with_capacity(HORIZON_WEEKS as usize);
    for week in 1..=HORIZON_WEEKS {
        let tonnes = CURRENT_MARKET_VOLUME + additional * ramp_factor(week);
        let utilisation = tonnes / MARKET_CAPACITY;
        let pressure = price_pressure(utilisation);
        weekly_projections.push(WeeklyProjection {
            week,
            tonnes,
            price: CURRENT_PRICE * (1.0 - pressure),
            utilisation,
            risk_level: classify_utilisation(utilisation),
            is_tipping_point: utilisation > TIPPING_UTILISATION,
        });
    }

    let tipping_threshold = TIPPING_UTILISATION * MARKET_CAPACITY;
    let buffer_to_tipping = (tipping_threshold - planned_weekly_volume).max(0.0);
    let buffer_percentage = buffer_to_tipping / planned_weekly_volume * 100.0;
    let current_risk_level = classify_utilisation(planned_weekly_volume / MARKET_CAPACITY);
    debug!(
        additional,
        planned_weekly_volume,
        buffer_to_tipping,
        %current_risk_level,
        "market impact computed"
    );

    Ok(MarketImpact {
        target_market: input.target_market,
        weekly_projections,
        tipping_threshold,
        planned_weekly_volume,
        buffer_to_tipping,
        buffer_percentage,
        current_risk_level,
    })
}
