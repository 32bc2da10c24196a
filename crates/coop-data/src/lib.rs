#![deny(warnings)]

//! Static baseline datasets per cooperative member company.
//!
//! The dashboard panels outside the scenario models render fixed historical
//! data. This crate keeps those datasets behind a single lookup: a known
//! company slug returns its dataset, anything else falls back to the
//! cooperative-wide aggregate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One month of delivered milk volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyYield {
    /// First day of the month the record covers.
    pub month: NaiveDate,
    /// Delivered volume, tonnes.
    pub tonnes: Decimal,
}

/// Share of processed volume going into one product group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductShare {
    pub product: String,
    /// Share of total processed volume, percent.
    pub share_pct: f64,
}

/// Baseline dataset for one member company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyDataset {
    /// Stable lookup key, e.g. "noordmelk".
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Twelve months of delivered volume.
    pub milk_yield: Vec<MonthlyYield>,
    /// Product allocation shares; sum to 100.
    pub product_allocation: Vec<ProductShare>,
}

fn month(m: u32) -> NaiveDate {
    // Data year is fixed; the panels label months only.
    NaiveDate::from_ymd_opt(2025, m, 1).expect("valid month literal")
}

fn yields(tonnes: [i64; 12]) -> Vec<MonthlyYield> {
    tonnes
        .iter()
        .enumerate()
        .map(|(i, &t)| MonthlyYield {
            month: month(i as u32 + 1),
            tonnes: Decimal::new(t, 0),
        })
        .collect()
}

fn shares(pairs: &[(&str, f64)]) -> Vec<ProductShare> {
    pairs
        .iter()
        .map(|&(product, share_pct)| ProductShare {
            product: product.to_string(),
            share_pct,
        })
        .collect()
}

fn noordmelk() -> CompanyDataset {
    CompanyDataset {
        slug: "noordmelk".to_string(),
        name: "NoordMelk Coöperatie".to_string(),
        milk_yield: yields([
            1480, 1455, 1510, 1545, 1620, 1585, 1550, 1530, 1495, 1470, 1450, 1465,
        ]),
        product_allocation: shares(&[
            ("Butter", 32.0),
            ("Cheese", 28.0),
            ("Milk powder", 22.0),
            ("Fresh dairy", 12.0),
            ("Whey", 6.0),
        ]),
    }
}

fn greenfields() -> CompanyDataset {
    CompanyDataset {
        slug: "greenfields".to_string(),
        name: "Greenfields Dairy Group".to_string(),
        milk_yield: yields([
            980, 965, 1010, 1040, 1085, 1060, 1035, 1020, 995, 975, 960, 970,
        ]),
        product_allocation: shares(&[
            ("Butter", 18.0),
            ("Cheese", 41.0),
            ("Milk powder", 16.0),
            ("Fresh dairy", 20.0),
            ("Whey", 5.0),
        ]),
    }
}

fn alpenhof() -> CompanyDataset {
    CompanyDataset {
        slug: "alpenhof".to_string(),
        name: "Alpenhof Molkerei".to_string(),
        milk_yield: yields([
            720, 705, 735, 760, 810, 795, 770, 755, 740, 725, 710, 715,
        ]),
        product_allocation: shares(&[
            ("Butter", 24.0),
            ("Cheese", 46.0),
            ("Milk powder", 8.0),
            ("Fresh dairy", 17.0),
            ("Whey", 5.0),
        ]),
    }
}

fn cooperative_aggregate() -> CompanyDataset {
    CompanyDataset {
        slug: "cooperative".to_string(),
        name: "Cooperative aggregate".to_string(),
        milk_yield: yields([
            3180, 3125, 3255, 3345, 3515, 3440, 3355, 3305, 3230, 3170, 3120, 3150,
        ]),
        product_allocation: shares(&[
            ("Butter", 26.0),
            ("Cheese", 36.0),
            ("Milk powder", 17.0),
            ("Fresh dairy", 16.0),
            ("Whey", 5.0),
        ]),
    }
}

/// Look up the dataset for a company slug.
///
/// Unknown slugs fall back to the cooperative aggregate so that a stale or
/// mistyped link still renders a page.
pub fn dataset_for(slug: &str) -> CompanyDataset {
    match slug {
        "noordmelk" => noordmelk(),
        "greenfields" => greenfields(),
        "alpenhof" => alpenhof(),
        other => {
            debug!(slug = other, "unknown company slug, using aggregate");
            cooperative_aggregate()
        }
    }
}

/// Slugs with a dedicated dataset, in display order.
pub fn known_slugs() -> &'static [&'static str] {
    &["noordmelk", "greenfields", "alpenhof"]
}
