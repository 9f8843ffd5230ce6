//! Tax jurisdictions: progressive slab tables and allowable deductions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TaxError;

/// One progressive band: income in `[from, to)` is taxed at `rate` percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub from: f64,
    /// Exclusive upper bound, `None` for the open top band
    pub to: Option<f64>,
    pub rate: f64,
}

impl TaxSlab {
    pub fn new(from: f64, to: f64, rate: f64) -> Self {
        Self {
            from,
            to: Some(to),
            rate,
        }
    }

    pub fn unbounded(from: f64, rate: f64) -> Self {
        Self {
            from,
            to: None,
            rate,
        }
    }
}

/// A deduction the taxpayer may claim, optionally capped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDeduction {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
}

impl TaxDeduction {
    fn new(
        key: &str,
        name: &str,
        description: &str,
        max_limit: Option<f64>,
        default_value: f64,
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            max_limit,
            default_value: Some(default_value),
        }
    }

    /// Claimed amount clamped to `[0, max_limit]`
    pub fn allowed(&self, claimed: f64) -> f64 {
        let claimed = if claimed.is_finite() { claimed.max(0.0) } else { 0.0 };
        match self.max_limit {
            Some(limit) => claimed.min(limit),
            None => claimed,
        }
    }
}

/// A country's income tax rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub code: String,
    pub name: String,
    pub currency_code: String,
    pub tax_year: String,
    pub income_description: String,
    pub slabs: Vec<TaxSlab>,
    pub deductions: Vec<TaxDeduction>,
}

impl Jurisdiction {
    /// Build a jurisdiction, rejecting slab tables that are not contiguous,
    /// ascending from zero and open at the top
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        currency_code: impl Into<String>,
        tax_year: impl Into<String>,
        income_description: impl Into<String>,
        slabs: Vec<TaxSlab>,
        deductions: Vec<TaxDeduction>,
    ) -> Result<Self, TaxError> {
        let jurisdiction = Self {
            code: code.into(),
            name: name.into(),
            currency_code: currency_code.into(),
            tax_year: tax_year.into(),
            income_description: income_description.into(),
            slabs,
            deductions,
        };
        jurisdiction.validate()?;
        Ok(jurisdiction)
    }

    /// Check the slab invariants
    pub fn validate(&self) -> Result<(), TaxError> {
        let invalid = |reason: String| TaxError::InvalidSlabs {
            code: self.code.clone(),
            reason,
        };

        let first = self
            .slabs
            .first()
            .ok_or_else(|| invalid("no slabs defined".to_string()))?;
        if first.from != 0.0 {
            return Err(invalid(format!("first slab starts at {}, expected 0", first.from)));
        }

        for (i, slab) in self.slabs.iter().enumerate() {
            if !(0.0..=100.0).contains(&slab.rate) {
                return Err(invalid(format!("slab {} has rate {}%", i + 1, slab.rate)));
            }

            match (slab.to, self.slabs.get(i + 1)) {
                (Some(to), Some(next)) => {
                    if to <= slab.from {
                        return Err(invalid(format!("slab {} is empty or inverted", i + 1)));
                    }
                    if next.from != to {
                        return Err(invalid(format!(
                            "slab {} ends at {} but slab {} starts at {}",
                            i + 1,
                            to,
                            i + 2,
                            next.from
                        )));
                    }
                }
                (None, Some(_)) => {
                    return Err(invalid(format!("unbounded slab {} is not the last", i + 1)));
                }
                (Some(_), None) => {
                    return Err(invalid("last slab must be unbounded".to_string()));
                }
                (None, None) => {}
            }
        }

        let mut keys: Vec<&str> = self.deductions.iter().map(|d| d.key.as_str()).collect();
        keys.sort_unstable();
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(invalid(format!("duplicate deduction key '{}'", pair[0])));
        }

        Ok(())
    }

    /// Default claim for every deduction (its default value, or 0)
    pub fn default_claims(&self) -> BTreeMap<String, f64> {
        self.deductions
            .iter()
            .map(|d| (d.key.clone(), d.default_value.unwrap_or(0.0)))
            .collect()
    }

    /// Starting gross income shown for this jurisdiction
    pub fn default_gross_income(&self) -> f64 {
        match self.code.as_str() {
            "IN" => 1_200_000.0,
            "US" => 75_000.0,
            _ => 50_000.0,
        }
    }

    /// Look up one of the built-in jurisdictions by code (case-insensitive)
    pub fn builtin(code: &str) -> Result<Self, TaxError> {
        builtin_jurisdictions()
            .into_iter()
            .find(|j| j.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| TaxError::UnknownJurisdiction(code.to_string()))
    }
}

/// The built-in jurisdictions: India, United States, United Kingdom, Canada
/// and Australia
pub fn builtin_jurisdictions() -> Vec<Jurisdiction> {
    vec![india(), united_states(), united_kingdom(), canada(), australia()]
}

fn india() -> Jurisdiction {
    Jurisdiction {
        code: "IN".into(),
        name: "India".into(),
        currency_code: "INR".into(),
        tax_year: "2024-25".into(),
        income_description: "Annual gross salary including basic pay, allowances, and perquisites".into(),
        slabs: vec![
            TaxSlab::new(0.0, 300_000.0, 0.0),
            TaxSlab::new(300_000.0, 700_000.0, 5.0),
            TaxSlab::new(700_000.0, 1_000_000.0, 10.0),
            TaxSlab::new(1_000_000.0, 1_200_000.0, 15.0),
            TaxSlab::new(1_200_000.0, 1_500_000.0, 20.0),
            TaxSlab::unbounded(1_500_000.0, 30.0),
        ],
        deductions: vec![
            TaxDeduction::new("section80C", "Section 80C (PPF, ELSS, Life Insurance)",
                "Investments in PPF, ELSS, life insurance premiums, etc.", Some(150_000.0), 150_000.0),
            TaxDeduction::new("section80D", "Section 80D (Health Insurance)",
                "Health insurance premiums for self and family", Some(75_000.0), 25_000.0),
            TaxDeduction::new("hra", "HRA (House Rent Allowance)",
                "House rent allowance exemption", None, 100_000.0),
            TaxDeduction::new("standardDeduction", "Standard Deduction",
                "Standard deduction for salaried individuals", Some(50_000.0), 50_000.0),
            TaxDeduction::new("section80E", "Section 80E (Education Loan Interest)",
                "Interest paid on education loan", None, 0.0),
        ],
    }
}

fn united_states() -> Jurisdiction {
    Jurisdiction {
        code: "US".into(),
        name: "United States".into(),
        currency_code: "USD".into(),
        tax_year: "2024".into(),
        income_description: "Annual gross income including wages, salary, tips, and other compensation".into(),
        slabs: vec![
            TaxSlab::new(0.0, 11_000.0, 10.0),
            TaxSlab::new(11_000.0, 44_725.0, 12.0),
            TaxSlab::new(44_725.0, 95_375.0, 22.0),
            TaxSlab::new(95_375.0, 182_050.0, 24.0),
            TaxSlab::new(182_050.0, 231_250.0, 32.0),
            TaxSlab::new(231_250.0, 578_125.0, 35.0),
            TaxSlab::unbounded(578_125.0, 37.0),
        ],
        deductions: vec![
            TaxDeduction::new("standardDeduction", "Standard Deduction (Single)",
                "Standard deduction for single filers", Some(13_850.0), 13_850.0),
            TaxDeduction::new("retirement401k", "401(k) Contributions",
                "Pre-tax contributions to 401(k) retirement plan", Some(22_500.0), 10_000.0),
            TaxDeduction::new("healthInsurance", "Health Insurance Premiums",
                "Pre-tax health insurance premiums", None, 3_000.0),
            TaxDeduction::new("studentLoanInterest", "Student Loan Interest",
                "Interest paid on qualified student loans", Some(2_500.0), 0.0),
        ],
    }
}

fn united_kingdom() -> Jurisdiction {
    Jurisdiction {
        code: "UK".into(),
        name: "United Kingdom".into(),
        currency_code: "GBP".into(),
        tax_year: "2024-25".into(),
        income_description: "Annual gross income including salary, wages, and taxable benefits".into(),
        slabs: vec![
            TaxSlab::new(0.0, 12_570.0, 0.0),
            TaxSlab::new(12_570.0, 50_270.0, 20.0),
            TaxSlab::new(50_270.0, 125_140.0, 40.0),
            TaxSlab::unbounded(125_140.0, 45.0),
        ],
        deductions: vec![
            TaxDeduction::new("personalAllowance", "Personal Allowance",
                "Tax-free personal allowance", Some(12_570.0), 12_570.0),
            TaxDeduction::new("pensionContributions", "Pension Contributions",
                "Contributions to registered pension schemes", None, 5_000.0),
            TaxDeduction::new("nationalInsurance", "National Insurance",
                "National Insurance contributions (calculated separately)", None, 0.0),
        ],
    }
}

fn canada() -> Jurisdiction {
    Jurisdiction {
        code: "CA".into(),
        name: "Canada".into(),
        currency_code: "CAD".into(),
        tax_year: "2024".into(),
        income_description: "Annual gross income including employment income and taxable benefits".into(),
        slabs: vec![
            TaxSlab::new(0.0, 53_359.0, 15.0),
            TaxSlab::new(53_359.0, 106_717.0, 20.5),
            TaxSlab::new(106_717.0, 165_430.0, 26.0),
            TaxSlab::new(165_430.0, 235_675.0, 29.0),
            TaxSlab::unbounded(235_675.0, 33.0),
        ],
        deductions: vec![
            TaxDeduction::new("basicPersonalAmount", "Basic Personal Amount",
                "Basic personal tax credit amount", Some(15_000.0), 15_000.0),
            TaxDeduction::new("rrspContributions", "RRSP Contributions",
                "Registered Retirement Savings Plan contributions", None, 8_000.0),
            TaxDeduction::new("employmentExpenses", "Employment Expenses",
                "Deductible employment-related expenses", None, 2_000.0),
        ],
    }
}

fn australia() -> Jurisdiction {
    Jurisdiction {
        code: "AU".into(),
        name: "Australia".into(),
        currency_code: "AUD".into(),
        tax_year: "2024-25".into(),
        income_description: "Annual gross income including salary, wages, and fringe benefits".into(),
        slabs: vec![
            TaxSlab::new(0.0, 18_200.0, 0.0),
            TaxSlab::new(18_200.0, 45_000.0, 19.0),
            TaxSlab::new(45_000.0, 120_000.0, 32.5),
            TaxSlab::new(120_000.0, 180_000.0, 37.0),
            TaxSlab::unbounded(180_000.0, 45.0),
        ],
        deductions: vec![
            TaxDeduction::new("taxFreeThreshold", "Tax-Free Threshold",
                "Tax-free threshold for residents", Some(18_200.0), 18_200.0),
            TaxDeduction::new("superContributions", "Superannuation Contributions",
                "Concessional superannuation contributions", Some(27_500.0), 10_000.0),
            TaxDeduction::new("workRelatedExpenses", "Work-Related Expenses",
                "Deductible work-related expenses", None, 3_000.0),
        ],
    }
}
