#![deny(warnings)]

//! Core domain types and invariants for the cooperative scenario models.
//!
//! This crate defines the serializable control inputs shared by the three
//! calculation models with validation helpers to guarantee basic invariants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Risk classification shared by all model outputs.
///
/// Ordering is by severity: `Low < Medium < High < Critical`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RiskLevel {
    /// Comfortable operating range.
    Low,
    /// Elevated but manageable.
    Medium,
    /// Close to the tipping threshold.
    High,
    /// Past the tipping threshold.
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// Export market targeted by a proposed volume injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMarket {
    Germany,
    Netherlands,
    France,
    Belgium,
}

impl fmt::Display for TargetMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetMarket::Germany => "Germany",
            TargetMarket::Netherlands => "Netherlands",
            TargetMarket::France => "France",
            TargetMarket::Belgium => "Belgium",
        };
        f.write_str(s)
    }
}

/// Planning horizon used to scale sensitivity figures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Quarterly,
    #[serde(rename = "halfyear")]
    HalfYear,
    Annual,
}

impl TimeHorizon {
    /// Number of weeks covered by the horizon.
    pub fn weeks(self) -> u32 {
        match self {
            TimeHorizon::Quarterly => 13,
            TimeHorizon::HalfYear => 26,
            TimeHorizon::Annual => 52,
        }
    }
}

/// How quickly a demand reduction takes effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Immediate,
    Gradual,
    Planned,
}

/// Commercial response accompanying a demand-reduction scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStrategy {
    Diversification,
    Premiumisation,
    VolumeReduction,
    Storage,
}

/// Destination regions in the allocation plan.
///
/// Serialized under the display names the plan table expects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Region {
    #[serde(rename = "China/Asia")]
    ChinaAsia,
    #[serde(rename = "Southeast Asia")]
    SoutheastAsia,
    Europe,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "Middle East")]
    MiddleEast,
}

impl Region {
    /// All regions, in plan display order.
    pub const ALL: [Region; 5] = [
        Region::ChinaAsia,
        Region::SoutheastAsia,
        Region::Europe,
        Region::Usa,
        Region::MiddleEast,
    ];

    /// Human-readable name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Region::ChinaAsia => "China/Asia",
            Region::SoutheastAsia => "Southeast Asia",
            Region::Europe => "Europe",
            Region::Usa => "USA",
            Region::MiddleEast => "Middle East",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Controls for the market impact model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketImpactInput {
    /// Proposed extra weekly volume, tonnes. Negative values withdraw volume.
    pub additional_volume_tonnes_per_week: f64,
    /// Market absorbing the injection.
    pub target_market: TargetMarket,
}

/// Controls for the sensitivity model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Wholesale price shock, currency units per tonne.
    pub price_change_per_tonne: f64,
    /// Horizon over which margin figures are accumulated.
    pub time_horizon: TimeHorizon,
}

/// Controls for the reallocation scenario model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Demand reduction applied to the China/Asia channel, percent.
    pub reduction_percentage: f64,
    /// Phase-in schedule for the reduction.
    pub timeframe: Timeframe,
    /// Commercial strategy paired with the reduction.
    pub response_strategy: ResponseStrategy,
    /// Keep China/Asia at or above its contractual allocation floor.
    pub respect_min_contracts: bool,
}

/// Supported range for `additional_volume_tonnes_per_week`.
pub const ADDITIONAL_VOLUME_RANGE: (f64, f64) = (-500.0, 1500.0);
/// Supported range for `price_change_per_tonne`.
pub const PRICE_CHANGE_RANGE: (f64, f64) = (-300.0, 300.0);
/// Supported range for `reduction_percentage`.
pub const REDUCTION_RANGE: (f64, f64) = (10.0, 60.0);

/// Validation errors for control inputs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Value outside its documented control range.
    #[error("{field} = {value} is out of supported range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Numeric field must be finite.
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),
}

fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate market impact controls.
///
/// The sliders in the dashboard clamp at the same bounds; validating here as
/// well keeps direct callers (tests, batch runs) honest.
pub fn validate_market_input(input: &MarketImpactInput) -> Result<(), ValidationError> {
    check_range(
        "additional_volume_tonnes_per_week",
        input.additional_volume_tonnes_per_week,
        ADDITIONAL_VOLUME_RANGE,
    )
}

/// Validate sensitivity controls.
pub fn validate_sensitivity_input(input: &SensitivityInput) -> Result<(), ValidationError> {
    check_range(
        "price_change_per_tonne",
        input.price_change_per_tonne,
        PRICE_CHANGE_RANGE,
    )
}

/// Validate reallocation scenario controls.
pub fn validate_scenario_input(input: &ScenarioInput) -> Result<(), ValidationError> {
    check_range(
        "reduction_percentage",
        input.reduction_percentage,
        REDUCTION_RANGE,
    )
}
