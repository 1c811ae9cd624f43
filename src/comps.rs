//! Per-listing investment ratios ("comps" rows).
//!
//! Works on a typed per-listing view rather than a loose payload map, so a
//! missing field is an explicit `None` all the way through. Every division
//! follows the safe-division rule: `None` when the denominator is missing
//! or zero.

use serde::{Deserialize, Serialize};

use crate::models::{ListingCategory, NormalizedListing};
use crate::stats::safe_div;

/// Underwriting assumptions applied to every row of a comps request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompsAssumptions {
    /// Percent of rent lost to vacancy.
    pub vacancy_pct: f64,
    /// Percent of rent reserved for maintenance.
    pub maintenance_pct_of_rent: f64,
    /// Percent of rent paid to management.
    pub mgmt_pct_of_rent: f64,
    pub taxes_annual: Option<f64>,
    pub insurance_annual: Option<f64>,
    pub hoa_monthly: Option<f64>,
    /// Overrides the listing's own price as the acquisition basis.
    pub purchase_price: Option<f64>,
    /// Caller-supplied rent estimate; carried on the request for the
    /// ranking/summary layers, not used in row derivation.
    pub market_rent: Option<f64>,
}

impl Default for CompsAssumptions {
    fn default() -> Self {
        Self {
            vacancy_pct: 5.0,
            maintenance_pct_of_rent: 8.0,
            mgmt_pct_of_rent: 8.0,
            taxes_annual: None,
            insurance_annual: None,
            hoa_monthly: None,
            purchase_price: None,
            market_rent: None,
        }
    }
}

/// Derived ratios for one listing. Any ratio whose inputs are missing is
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompRowMetrics {
    pub price_per_sqft: Option<f64>,
    pub rent_per_sqft: Option<f64>,
    /// Annual rent over sale price.
    pub rent_to_price: Option<f64>,
    /// Annual rent over acquisition basis.
    pub gross_yield: Option<f64>,
    /// Net operating income over acquisition basis.
    pub cap_rate: Option<f64>,
    /// Gross rent multiplier: acquisition basis over annual rent.
    pub grm: Option<f64>,
}

/// The slice of a listing the comps computation actually reads, extracted
/// once up front.
#[derive(Debug, Clone, Copy)]
struct CompInputs {
    category: ListingCategory,
    sqft: Option<f64>,
    list_price: Option<f64>,
}

impl From<&NormalizedListing> for CompInputs {
    fn from(listing: &NormalizedListing) -> Self {
        Self {
            category: listing.category,
            sqft: listing.facts.sqft.map(f64::from),
            list_price: listing.pricing.list_price,
        }
    }
}

/// Compute the derived ratio row for one listing under `assumptions`.
///
/// The meaning of `list_price` follows the category: monthly rent for
/// rentals, total price for sales.
pub fn compute_comp_metrics(
    listing: &NormalizedListing,
    assumptions: &CompsAssumptions,
) -> CompRowMetrics {
    let inputs = CompInputs::from(listing);

    let rent_monthly = match inputs.category {
        ListingCategory::Rental => inputs.list_price,
        ListingCategory::Sale => None,
    };
    let price = match inputs.category {
        ListingCategory::Sale => inputs.list_price,
        ListingCategory::Rental => None,
    };

    let annual_rent = rent_monthly.map(|r| r * 12.0);
    let op_ex_annual = annual_rent.map(|ar| {
        ar * (assumptions.maintenance_pct_of_rent + assumptions.mgmt_pct_of_rent) / 100.0
            + assumptions.taxes_annual.unwrap_or(0.0)
            + assumptions.insurance_annual.unwrap_or(0.0)
            + assumptions.hoa_monthly.unwrap_or(0.0) * 12.0
    });
    let purchase_price = assumptions.purchase_price.or(price);

    CompRowMetrics {
        price_per_sqft: safe_div(price, inputs.sqft),
        rent_per_sqft: safe_div(rent_monthly, inputs.sqft),
        rent_to_price: safe_div(annual_rent, price),
        gross_yield: safe_div(annual_rent, purchase_price),
        cap_rate: cap_rate(
            annual_rent,
            assumptions.vacancy_pct,
            op_ex_annual,
            purchase_price,
        ),
        grm: safe_div(purchase_price, annual_rent),
    }
}

/// Capitalization rate. When operating expenses are unknowable (no rent,
/// hence no expense model), falls back to effective rent over basis.
fn cap_rate(
    annual_rent: Option<f64>,
    vacancy_pct: f64,
    op_ex_annual: Option<f64>,
    purchase_price: Option<f64>,
) -> Option<f64> {
    let annual_rent = annual_rent?;
    let effective = annual_rent * (1.0 - vacancy_pct / 100.0);
    match op_ex_annual {
        Some(op_ex) => safe_div(Some(effective - op_ex), purchase_price),
        None => safe_div(Some(effective), purchase_price),
    }
}
