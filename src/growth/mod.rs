//! Closed-form compound growth models: SIP, lump sum, EMI and CAGR
//!
//! Each model takes validated positive inputs (see [`crate::inputs`]) and an
//! optional annual inflation percentage. When inflation is given and positive
//! the result also carries real (inflation-adjusted) figures.

mod discount;
mod sip;
mod lumpsum;
mod emi;
mod cagr;

pub use discount::{annuity_due_future_value, level_payment, Inflation};
pub use sip::{sip, SipPoint, SipResult, SIP_SERIES_POINTS};
pub use lumpsum::{lump_sum, LumpSumPoint, LumpSumResult};
pub use emi::{emi, AmortizationRow, EmiResult, EMI_SCHEDULE_MONTHS};
pub use cagr::{cagr, CagrPoint, CagrResult};
