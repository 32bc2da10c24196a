#![deny(warnings)]

//! Headless CLI for running the three scenario models against a control file.

use anyhow::{Context, Result};
use chrono::Datelike;
use rust_decimal::Decimal;
use scen_core::{
    MarketImpactInput, ResponseStrategy, ScenarioInput, SensitivityInput, TargetMarket,
    TimeHorizon, Timeframe,
};
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Control inputs loaded from a `--scenario` YAML file. Missing sections
/// fall back to the baseline controls the dashboard starts with.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    market: Option<MarketImpactInput>,
    sensitivity: Option<SensitivityInput>,
    scenario: Option<ScenarioInput>,
}

fn parse_args() -> (Option<String>, Option<String>, bool) {
    let mut scenario_path: Option<String> = None;
    let mut company: Option<String> = None;
    let mut json = false;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => scenario_path = it.next(),
            "--company" => company = it.next(),
            "--json" => json = true,
            _ => {}
        }
    }
    (scenario_path, company, json)
}

fn default_market() -> MarketImpactInput {
    MarketImpactInput {
        additional_volume_tonnes_per_week: 600.0,
        target_market: TargetMarket::Germany,
    }
}

fn default_sensitivity() -> SensitivityInput {
    SensitivityInput {
        price_change_per_tonne: -100.0,
        time_horizon: TimeHorizon::Quarterly,
    }
}

fn default_scenario() -> ScenarioInput {
    ScenarioInput {
        reduction_percentage: 30.0,
        timeframe: Timeframe::Gradual,
        response_strategy: ResponseStrategy::Diversification,
        respect_min_contracts: true,
    }
}

fn load_scenario_file(path: &str) -> Result<ScenarioFile> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading scenario file {path}"))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing scenario file {path}"))
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let (scenario_path, company, json) = parse_args();
    info!(build = env!("GIT_SHA"), ?scenario_path, ?company, "starting CLI");

    let file = match &scenario_path {
        Some(path) => load_scenario_file(path)?,
        None => ScenarioFile::default(),
    };
    let market_input = file.market.unwrap_or_else(default_market);
    let sensitivity_input = file.sensitivity.unwrap_or_else(default_sensitivity);
    let scenario_input = file.scenario.unwrap_or_else(default_scenario);

    let market = scen_market::compute_market_impact(&market_input)?;
    let sensitivity = scen_sensitivity::compute_sensitivity(&sensitivity_input)?;
    let plan = scen_alloc::compute_scenario(&scenario_input)?;

    if json {
        let out = serde_json::json!({
            "market": market,
            "sensitivity": sensitivity,
            "scenario": plan,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Market | target: {} | planned: {:.0} t/wk | tipping at: {:.0} t | buffer: {:.0} t ({:.1}%) | risk: {}",
        market.target_market,
        market.planned_weekly_volume,
        market.tipping_threshold,
        market.buffer_to_tipping,
        market.buffer_percentage,
        market.current_risk_level
    );
    for row in &market.weekly_projections {
        println!(
            "  wk {:>2} | {:>6.0} t | {:>8.2}/t | util {:>5.1}% | {}{}",
            row.week,
            row.tonnes,
            row.price,
            row.utilisation * 100.0,
            row.risk_level,
            if row.is_tipping_point { " [tipping]" } else { "" }
        );
    }

    println!(
        "Sensitivity | shock: {:+.0}/t | horizon: {} weeks",
        sensitivity_input.price_change_per_tonne,
        sensitivity_input.time_horizon.weeks()
    );
    for row in &sensitivity.results {
        println!(
            "  {:<15} | base {:>10.2} | impact {:>10.2} | {:>+7.2}% | {}",
            row.category, row.base_value, row.impact_value, row.percent_change, row.risk_level
        );
    }

    println!(
        "Scenario | withdrawn: {:.1} pp | total expected return: {:+.2} k/wk",
        plan.actual_reduction_pct_points, plan.total_expected_return
    );
    for rec in &plan.recommendations {
        println!(
            "  {:<14} | {:>4.1}% -> {:>5.2}% | {:>+6.2} k/wk | {}",
            rec.region,
            rec.current_allocation_pct,
            rec.recommended_allocation_pct,
            rec.expected_return_k_eur_per_week,
            rec.rationale
        );
    }

    if let Some(slug) = company {
        let ds = coop_data::dataset_for(&slug);
        let annual: Decimal = ds.milk_yield.iter().map(|m| m.tonnes).sum();
        let year = ds.milk_yield.first().map(|m| m.month.year()).unwrap_or(0);
        println!(
            "Company | {} | {} yield: {} t | product groups: {}",
            ds.name,
            year,
            annual,
            ds.product_allocation.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_boundary_validation() {
        assert!(scen_core::validate_market_input(&default_market()).is_ok());
        assert!(scen_core::validate_sensitivity_input(&default_sensitivity()).is_ok());
        assert!(scen_core::validate_scenario_input(&default_scenario()).is_ok());
    }

    #[test]
    fn scenario_file_parses_partial_sections() {
        let yaml = "\
market:
  additional_volume_tonnes_per_week: 250
  target_market: belgium
scenario:
  reduction_percentage: 45
  timeframe: planned
  response_strategy: volume_reduction
  respect_min_contracts: false
";
        let file: ScenarioFile = serde_yaml::from_str(yaml).unwrap();
        let market = file.market.unwrap();
        assert_eq!(market.target_market, TargetMarket::Belgium);
        assert!(file.sensitivity.is_none());
        assert!(!file.scenario.unwrap().respect_min_contracts);
    }

    #[test]
    fn scenario_file_rejects_unknown_sections() {
        let yaml = "chatbot:\n  enabled: true\n";
        assert!(serde_yaml::from_str::<ScenarioFile>(yaml).is_err());
    }
}
