//! XIRR calculation over dated cash flows

mod cashflow;
mod solver;

pub use cashflow::{load_cash_flows, load_cash_flows_from_reader, CashFlow};
pub use solver::{npv, xirr, CumulativePoint, XirrResult, DAYS_PER_YEAR};
