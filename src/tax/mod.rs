//! Income tax: progressive slabs with capped deductions per jurisdiction

mod jurisdiction;
mod engine;
pub mod loader;

pub use jurisdiction::{builtin_jurisdictions, Jurisdiction, TaxDeduction, TaxSlab};
pub use engine::{calculate_income_tax, TaxBreakdown, TaxCalculation};
pub use loader::load_jurisdiction;
