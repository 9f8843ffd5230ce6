//! CSV-based jurisdiction loader
//!
//! A jurisdiction directory holds three files:
//! - `jurisdiction.csv`: code,name,currency,tax_year,income_description (one row)
//! - `slabs.csv`: from,to,rate (empty `to` = unbounded)
//! - `deductions.csv`: key,name,description,max_limit,default_value

use csv::Reader;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use super::jurisdiction::{Jurisdiction, TaxDeduction, TaxSlab};
use crate::error::{LoadError, TaxError};

#[derive(Debug, Deserialize)]
struct HeaderRow {
    code: String,
    name: String,
    currency: String,
    tax_year: String,
    #[serde(default)]
    income_description: String,
}

#[derive(Debug, Deserialize)]
struct SlabRow {
    from: f64,
    to: Option<f64>,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct DeductionRow {
    key: String,
    name: String,
    description: Option<String>,
    max_limit: Option<f64>,
    default_value: Option<f64>,
}

/// Load slab rows from `slabs.csv`
pub fn load_slabs(path: &Path) -> Result<Vec<TaxSlab>, LoadError> {
    let file = File::open(path.join("slabs.csv"))?;
    let mut reader = Reader::from_reader(file);

    let mut slabs = Vec::new();
    for result in reader.deserialize() {
        let row: SlabRow = result?;
        slabs.push(TaxSlab {
            from: row.from,
            to: row.to,
            rate: row.rate,
        });
    }

    Ok(slabs)
}

/// Load deduction rows from `deductions.csv`
pub fn load_deductions(path: &Path) -> Result<Vec<TaxDeduction>, LoadError> {
    let file = File::open(path.join("deductions.csv"))?;
    let mut reader = Reader::from_reader(file);

    let mut deductions = Vec::new();
    for result in reader.deserialize() {
        let row: DeductionRow = result?;
        deductions.push(TaxDeduction {
            key: row.key,
            name: row.name,
            description: row.description.filter(|d| !d.is_empty()),
            max_limit: row.max_limit,
            default_value: row.default_value,
        });
    }

    Ok(deductions)
}

/// Load and validate a jurisdiction from a directory
pub fn load_jurisdiction(path: &Path) -> Result<Jurisdiction, TaxError> {
    let file = File::open(path.join("jurisdiction.csv")).map_err(LoadError::from)?;
    let mut reader = Reader::from_reader(file);

    let header: HeaderRow = reader
        .deserialize()
        .next()
        .ok_or(LoadError::Format {
            row: 2,
            message: "jurisdiction.csv has no data row".to_string(),
        })?
        .map_err(LoadError::from)?;

    Jurisdiction::new(
        header.code,
        header.name,
        header.currency,
        header.tax_year,
        header.income_description,
        load_slabs(path)?,
        load_deductions(path)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fin_toolkit_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_jurisdiction() {
        let dir = scratch_dir("tax_ok");
        fs::write(
            dir.join("jurisdiction.csv"),
            "code,name,currency,tax_year,income_description\nNZ,New Zealand,NZD,2024-25,Annual income\n",
        )
        .unwrap();
        fs::write(
            dir.join("slabs.csv"),
            "from,to,rate\n0,15600,10.5\n15600,53500,17.5\n53500,,30\n",
        )
        .unwrap();
        fs::write(
            dir.join("deductions.csv"),
            "key,name,description,max_limit,default_value\nkiwisaver,KiwiSaver,,1000,500\ndonations,Donations,Gifts,,\n",
        )
        .unwrap();

        let jurisdiction = load_jurisdiction(&dir).unwrap();
        assert_eq!(jurisdiction.code, "NZ");
        assert_eq!(jurisdiction.slabs.len(), 3);
        assert_eq!(jurisdiction.slabs[2].to, None);
        assert_eq!(jurisdiction.deductions[0].max_limit, Some(1_000.0));
        assert!(jurisdiction.deductions[0].description.is_none());
        assert_eq!(jurisdiction.deductions[1].default_value, None);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_bad_slabs() {
        let dir = scratch_dir("tax_bad");
        fs::write(
            dir.join("jurisdiction.csv"),
            "code,name,currency,tax_year,income_description\nZZ,Broken,USD,2024,\n",
        )
        .unwrap();
        fs::write(dir.join("slabs.csv"), "from,to,rate\n0,1000,0\n2000,,10\n").unwrap();
        fs::write(dir.join("deductions.csv"), "key,name,description,max_limit,default_value\n").unwrap();

        assert!(matches!(load_jurisdiction(&dir), Err(TaxError::InvalidSlabs { .. })));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory() {
        let missing = Path::new("/nonexistent/fin_toolkit/jurisdiction");
        assert!(matches!(load_jurisdiction(missing), Err(TaxError::Load(LoadError::Io(_)))));
    }
}
