//! Progressive income tax evaluation

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::jurisdiction::Jurisdiction;

/// Tax charged within one slab; slabs above the taxable income still get a
/// zero row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub from: f64,
    pub to: Option<f64>,
    pub rate: f64,
    pub taxable_amount: f64,
    pub tax_on_slab: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub gross_income: f64,
    pub total_deductions: f64,
    pub taxable_income: f64,
    pub total_tax: f64,
    pub net_income: f64,
    /// Total tax as a percentage of gross income
    pub effective_tax_rate: f64,
    /// Allowed amount for every deduction of the jurisdiction
    pub deductions_used: BTreeMap<String, f64>,
    pub tax_breakdown: Vec<TaxBreakdown>,
}

/// Apply `jurisdiction`'s deductions and slabs to `gross_income`.
///
/// `claims` maps deduction keys to claimed amounts. Missing keys count as 0,
/// keys the jurisdiction does not define are ignored.
pub fn calculate_income_tax(
    jurisdiction: &Jurisdiction,
    gross_income: f64,
    claims: &BTreeMap<String, f64>,
) -> TaxCalculation {
    let gross_income = if gross_income.is_finite() { gross_income.max(0.0) } else { 0.0 };

    for key in claims.keys() {
        if !jurisdiction.deductions.iter().any(|d| &d.key == key) {
            debug!("ignoring unknown deduction '{}' for {}", key, jurisdiction.code);
        }
    }

    let mut deductions_used = BTreeMap::new();
    let mut total_deductions = 0.0;
    for deduction in &jurisdiction.deductions {
        let claimed = claims.get(&deduction.key).copied().unwrap_or(0.0);
        let allowed = deduction.allowed(claimed);
        deductions_used.insert(deduction.key.clone(), allowed);
        total_deductions += allowed;
    }

    let taxable_income = (gross_income - total_deductions).max(0.0);

    let mut total_tax = 0.0;
    let tax_breakdown = jurisdiction
        .slabs
        .iter()
        .map(|slab| {
            let taxable_amount = if taxable_income > slab.from {
                let slab_end = slab.to.map_or(taxable_income, |to| to.min(taxable_income));
                (slab_end - slab.from).max(0.0)
            } else {
                0.0
            };
            let tax_on_slab = taxable_amount * slab.rate / 100.0;
            total_tax += tax_on_slab;

            TaxBreakdown {
                from: slab.from,
                to: slab.to,
                rate: slab.rate,
                taxable_amount,
                tax_on_slab,
            }
        })
        .collect();

    let net_income = gross_income - total_tax;
    let effective_tax_rate = if gross_income > 0.0 {
        total_tax / gross_income * 100.0
    } else {
        0.0
    };

    TaxCalculation {
        gross_income,
        total_deductions,
        taxable_income,
        total_tax,
        net_income,
        effective_tax_rate,
        deductions_used,
        tax_breakdown,
    }
}
