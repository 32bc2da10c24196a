#![deny(warnings)]

//! Sensitivity model: business-impact figures for a wholesale price shock.
//!
//! A single price change per tonne is mapped to three impact rows (profit
//! margins, farmer payments, risk exposure) plus a sweep table across the
//! −200..200 shock range. Margin figures are accumulated over the selected
//! planning horizon; the sweep is horizon-independent.

use scen_core::{validate_sensitivity_input, RiskLevel, SensitivityInput};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Reference butter price, currency units per tonne.
pub const BUTTER_PRICE: f64 = 5200.0;
/// Processed volume, tonnes per week.
pub const WEEKLY_VOLUME: f64 = 1500.0;
/// Baseline margin, currency units per tonne.
pub const MARGIN_PER_TONNE: f64 = 400.0;
/// Baseline farmgate milk price, currency units per kg.
pub const FARMGATE_PRICE_PER_KG: f64 = 0.42;
/// Fraction of a wholesale price change passed through to farmers.
pub const FARMGATE_PASS_THROUGH: f64 = 0.20;
/// Baseline open risk exposure, million currency units.
pub const RISK_EXPOSURE_M: f64 = 2.1;

/// Fraction of the absolute price-change percentage added to risk exposure.
const RISK_EXPOSURE_FACTOR: f64 = 0.5;

const SWEEP_MIN: i32 = -200;
const SWEEP_MAX: i32 = 200;
const SWEEP_STEP: i32 = 50;

/// Errors produced by the sensitivity model.
#[derive(Debug, Error, PartialEq)]
pub enum SensitivityError {
    /// Control input failed boundary validation.
    #[error(transparent)]
    Invalid(#[from] scen_core::ValidationError),
}

/// Business dimension a sensitivity row reports on.
///
/// Serialized under the display names the table component expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactCategory {
    #[serde(rename = "Profit Margins")]
    ProfitMargins,
    #[serde(rename = "Farmer Payments")]
    FarmerPayments,
    #[serde(rename = "Risk Exposure")]
    RiskExposure,
}

impl ImpactCategory {
    /// Display name used in reports and tables.
    pub fn name(self) -> &'static str {
        match self {
            ImpactCategory::ProfitMargins => "Profit Margins",
            ImpactCategory::FarmerPayments => "Farmer Payments",
            ImpactCategory::RiskExposure => "Risk Exposure",
        }
    }

    /// Classify a percent change against the category's fixed thresholds.
    ///
    /// The splits differ per category: margins 15/8, farmer payments 10/5,
    /// risk exposure 25/15, all on the magnitude of the change.
    pub fn classify(self, percent_change: f64) -> RiskLevel {
        let magnitude = percent_change.abs();
        let (high, medium) = match self {
            ImpactCategory::ProfitMargins => (15.0, 8.0),
            ImpactCategory::FarmerPayments => (10.0, 5.0),
            ImpactCategory::RiskExposure => (25.0, 15.0),
        };
        if magnitude > high {
            RiskLevel::High
        } else if magnitude > medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One impact row of the sensitivity report.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub category: ImpactCategory,
    /// Baseline value in the category's own unit.
    pub base_value: f64,
    /// Value after the price shock, same unit as `base_value`.
    pub impact_value: f64,
    /// Relative change, percent.
    pub percent_change: f64,
    /// Classification of `percent_change` against the category thresholds.
    pub risk_level: RiskLevel,
}

/// One row of the horizon-independent sweep table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Price shock, currency units per tonne.
    pub price_change: f64,
    pub margin_impact_pct: f64,
    pub farmer_impact_pct: f64,
    /// Mean of the margin and farmer impacts.
    pub net_impact_pct: f64,
}

/// Full sensitivity output: three category rows plus the sweep table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub results: Vec<SensitivityResult>,
    pub sweep: Vec<SweepRow>,
}

/// Margin impact percentage for a wholesale price shift.
///
/// Keeps the established planning-sheet arithmetic: the absolute shock is
/// netted against the margin baseline before the unit shift, so the result
/// is not a plain percentage-of-margin-lost. Changing this would move every
/// downstream margin figure.
pub fn margin_impact_pct(price_change: f64) -> f64 {
    ((MARGIN_PER_TONNE - price_change.abs()) / MARGIN_PER_TONNE - 1.0) * 100.0
}

/// Farmer payment impact as a percentage of the farmgate price.
pub fn farmer_payment_impact_pct(price_change: f64) -> f64 {
    price_change / BUTTER_PRICE * 100.0 * FARMGATE_PASS_THROUGH
}

/// Compute the sensitivity report for a price shock over a planning horizon.
pub fn compute_sensitivity(input: &SensitivityInput) -> Result<SensitivityReport, SensitivityError> {
    validate_sensitivity_input(input)?;
    let change = input.price_change_per_tonne;
    let price_change_percent = change / BUTTER_PRICE * 100.0;
    let weeks = f64::from(input.time_horizon.weeks());

    let margin_pct = margin_impact_pct(change);
    let farmer_pct = price_change_percent * FARMGATE_PASS_THROUGH;
    let risk_pct = price_change_percent.abs() * RISK_EXPOSURE_FACTOR;

    let new_margin = MARGIN_PER_TONNE * (1.0 + margin_pct / 100.0);
    let new_farmer_payment = FARMGATE_PRICE_PER_KG * (1.0 + farmer_pct / 100.0);
    let new_risk_exposure = RISK_EXPOSURE_M * (1.0 + risk_pct / 100.0);

    // Margin rows are expressed in thousands of currency units per horizon.
    let horizon_scale = WEEKLY_VOLUME * weeks / 1000.0;

    let results = vec![
        SensitivityResult {
            category: ImpactCategory::ProfitMargins,
            base_value: MARGIN_PER_TONNE * horizon_scale,
            impact_value: new_margin * horizon_scale,
            percent_change: margin_pct,
            risk_level: ImpactCategory::ProfitMargins.classify(margin_pct),
        },
        SensitivityResult {
            category: ImpactCategory::FarmerPayments,
            base_value: FARMGATE_PRICE_PER_KG,
            impact_value: new_farmer_payment,
            percent_change: farmer_pct,
            risk_level: ImpactCategory::FarmerPayments.classify(farmer_pct),
        },
        SensitivityResult {
            category: ImpactCategory::RiskExposure,
            base_value: RISK_EXPOSURE_M,
            impact_value: new_risk_exposure,
            percent_change: risk_pct,
            risk_level: ImpactCategory::RiskExposure.classify(risk_pct),
        },
    ];

    debug!(change, margin_pct, farmer_pct, risk_pct, "sensitivity computed");

    Ok(SensitivityReport {
        results,
        sweep: sweep_table(),
    })
}

/// Sweep table over the −200..200 shock range, step 50.
pub fn sweep_table() -> Vec<SweepRow> {
    let mut rows = Vec::new();
    let mut shock = SWEEP_MIN;
    while shock <= SWEEP_MAX {
        let price_change = f64::from(shock);
        let margin = margin_impact_pct(price_change);
        let farmer = farmer_payment_impact_pct(price_change);
        rows.push(SweepRow {
            price_change,
            margin_impact_pct: margin,
            farmer_impact_pct: farmer,
            net_impact_pct: (margin + farmer) / 2.0,
        });
        shock += SWEEP_STEP;
    }
    rows
}
