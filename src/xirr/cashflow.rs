//! Dated cash flows and their CSV loader

use chrono::NaiveDate;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LoadError;

/// A signed amount on a calendar date (negative = money invested)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_investment(&self) -> bool {
        self.amount < 0.0
    }
}

/// Raw CSV row: `date,amount,description`
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: f64,
    #[serde(default)]
    description: Option<String>,
}

impl CsvRow {
    fn into_cash_flow(self, row: usize) -> Result<CashFlow, LoadError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            LoadError::Format {
                row,
                message: format!("date '{}': {}", self.date, e),
            }
        })?;

        if !self.amount.is_finite() {
            return Err(LoadError::Format {
                row,
                message: format!("amount is not finite: {}", self.amount),
            });
        }

        Ok(CashFlow {
            date,
            amount: self.amount,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// Load cash flows from a CSV file
pub fn load_cash_flows<P: AsRef<Path>>(path: P) -> Result<Vec<CashFlow>, LoadError> {
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load cash flows from any reader (e.g., string buffer, stdin)
pub fn load_cash_flows_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<CashFlow>, LoadError> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<CashFlow>, LoadError> {
    let mut flows = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Row 1 is the header
        flows.push(row.into_cash_flow(index + 2)?);
    }

    Ok(flows)
}
