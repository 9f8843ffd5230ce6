//! fin_toolkit CLI
//!
//! One subcommand per calculator. Results print as a short table in the
//! selected display currency, or as JSON with `--json`. Series data (SIP
//! months, amortization rows, cumulative cash flows, tax slabs) can be written
//! to CSV with `--series-csv`.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use fin_toolkit::cache::Calculator;
use fin_toolkit::config::{Preferences, Settings};
use fin_toolkit::currency::{
    convert, os_noise, synthetic_history, CachedRateProvider, RateCache, StaticRateProvider,
};
use fin_toolkit::format::{format_currency, format_currency_compact, format_exchange_rate, supported_currencies, Currency};
use fin_toolkit::growth::{lump_sum, sip};
use fin_toolkit::inputs::{sanitize_claims, CagrInput, EmiInput, LumpSumInput, SipInput, DEFAULT_INFLATION_PCT};
use fin_toolkit::tax::{builtin_jurisdictions, calculate_income_tax, load_jurisdiction, Jurisdiction};
use fin_toolkit::xirr::{load_cash_flows, xirr};

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal finance calculators", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Display currency code (overrides the stored preference)
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Write the result's series to this CSV file
    #[arg(long, global = true)]
    series_csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Systematic investment plan: fixed monthly contributions
    Sip {
        #[arg(long, default_value_t = SipInput::default().monthly_investment)]
        monthly: f64,
        /// Expected annual return in percent
        #[arg(long, default_value_t = SipInput::default().annual_return)]
        rate: f64,
        #[arg(long, default_value_t = SipInput::default().years)]
        years: u32,
        #[command(flatten)]
        inflation: InflationArgs,
    },
    /// One-time investment compounded annually
    Lumpsum {
        #[arg(long, default_value_t = LumpSumInput::default().principal)]
        principal: f64,
        #[arg(long, default_value_t = LumpSumInput::default().annual_return)]
        rate: f64,
        #[arg(long, default_value_t = LumpSumInput::default().years)]
        years: u32,
        #[command(flatten)]
        inflation: InflationArgs,
    },
    /// Loan installment and amortization schedule
    Emi {
        #[arg(long, default_value_t = EmiInput::default().loan_amount)]
        loan: f64,
        /// Annual interest rate in percent
        #[arg(long, default_value_t = EmiInput::default().interest_rate)]
        rate: f64,
        /// Tenure in years
        #[arg(long, default_value_t = EmiInput::default().tenure)]
        tenure: u32,
        #[command(flatten)]
        inflation: InflationArgs,
    },
    /// Compound annual growth rate between two values
    Cagr {
        #[arg(long, default_value_t = CagrInput::default().initial_value)]
        initial: f64,
        #[arg(long = "final", default_value_t = CagrInput::default().final_value)]
        final_value: f64,
        #[arg(long, default_value_t = CagrInput::default().years)]
        years: u32,
        #[command(flatten)]
        inflation: InflationArgs,
    },
    /// Internal rate of return of dated cash flows from a CSV (date,amount,description)
    Xirr { csv: PathBuf },
    /// Income tax under a built-in or CSV-defined jurisdiction
    Tax {
        /// Built-in jurisdiction code (IN, US, UK, CA, AU)
        #[arg(long, default_value = "IN")]
        country: String,
        /// Directory with jurisdiction.csv, slabs.csv and deductions.csv
        #[arg(long, conflicts_with = "country")]
        jurisdiction_dir: Option<PathBuf>,
        /// Gross annual income (defaults to a typical income for the jurisdiction)
        #[arg(long)]
        income: Option<f64>,
        /// Deduction claim as key=amount; repeatable
        #[arg(long = "deduction", value_parser = parse_claim)]
        deductions: Vec<(String, f64)>,
        /// Start from the jurisdiction's default claims
        #[arg(long, default_value_t = false)]
        default_deductions: bool,
    },
    /// Convert an amount between currencies
    Convert {
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "USD")]
        from: String,
        #[arg(long, default_value = "INR")]
        to: String,
        /// JSON rates file (falls back to FIN_RATES_FILE)
        #[arg(long)]
        rates: Option<PathBuf>,
        /// Also print a synthetic trailing history of this many days
        #[arg(long)]
        history_days: Option<u32>,
    },
    /// Evaluate SIP and lump-sum outcomes over a grid of rates and horizons
    Sweep {
        #[arg(long, default_value_t = SipInput::default().monthly_investment)]
        monthly: f64,
        #[arg(long, default_value_t = LumpSumInput::default().principal)]
        principal: f64,
        #[arg(long, value_delimiter = ',', default_values_t = vec![8.0, 10.0, 12.0, 15.0])]
        rates: Vec<f64>,
        #[arg(long, value_delimiter = ',', default_values_t = vec![5, 10, 20, 30])]
        years: Vec<u32>,
    },
    /// Show or change the stored display currency
    Currency {
        /// Currency code to store
        #[arg(long)]
        set: Option<String>,
        /// List supported currencies
        #[arg(long, default_value_t = false)]
        list: bool,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
struct InflationArgs {
    /// Report inflation-adjusted figures
    #[arg(long, default_value_t = false)]
    real: bool,
    /// Annual inflation in percent (implies --real)
    #[arg(long)]
    inflation: Option<f64>,
}

impl InflationArgs {
    fn pct(&self) -> Option<f64> {
        match (self.inflation, self.real) {
            (Some(pct), _) => Some(pct),
            (None, true) => Some(DEFAULT_INFLATION_PCT),
            (None, false) => None,
        }
    }
}

fn parse_claim(raw: &str) -> Result<(String, f64), String> {
    let (key, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=amount, got '{}'", raw))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad amount for {}: {}", key, e))?;
    Ok((key.trim().to_string(), amount))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("reading FIN_* settings")?;
    let start = Instant::now();

    match &cli.command {
        Command::Currency { set, list } => run_currency(&settings, set.as_deref(), *list, cli.json)?,
        command => {
            let currency = display_currency(&cli, &settings)?;
            let mut calculator = Calculator::with_capacity(settings.cache_capacity);
            run(command, &cli, &settings, &currency, &mut calculator)?;
            let (hits, misses) = calculator.stats();
            debug!("calculation cache: {} hits, {} misses", hits, misses);
        }
    }

    info!("done in {:?}", start.elapsed());
    Ok(())
}

fn display_currency(cli: &Cli, settings: &Settings) -> Result<Currency> {
    if let Some(code) = &cli.currency {
        return Currency::find(code).ok_or_else(|| anyhow!("unsupported currency {}", code));
    }
    if settings.prefs_path.exists() {
        let prefs = Preferences::load(&settings.prefs_path)
            .with_context(|| format!("reading {}", settings.prefs_path.display()))?;
        return Ok(prefs.currency());
    }
    Ok(Currency::find(&settings.currency).unwrap_or_default())
}

fn run(command: &Command, cli: &Cli, settings: &Settings, currency: &Currency, calculator: &mut Calculator) -> Result<()> {
    let money = |amount: f64| format_currency(amount, currency);
    let series_csv = cli.series_csv.as_deref();

    match command {
        Command::Sip { monthly, rate, years, inflation } => {
            let input = SipInput {
                monthly_investment: *monthly,
                annual_return: *rate,
                years: *years,
                inflation_rate: inflation.pct(),
            }
            .clamped();
            let result = calculator.sip(input.monthly_investment, input.annual_return, input.years, input.inflation_rate);
            write_series(series_csv, &result.monthly_data)?;
            if cli.json {
                return print_json(&result);
            }
            println!("SIP of {}/month at {}% for {} years", money(result.monthly_investment), result.annual_return, result.years);
            println!("  Invested:       {}", money(result.total_invested));
            println!("  Returns:        {}", money(result.expected_returns));
            println!("  Maturity value: {} ({})", money(result.maturity_value), format_currency_compact(result.maturity_value, currency));
            if let Some(real) = result.real_maturity_value {
                println!("  Real maturity:  {}", money(real));
            }
        }
        Command::Lumpsum { principal, rate, years, inflation } => {
            let input = LumpSumInput {
                principal: *principal,
                annual_return: *rate,
                years: *years,
                inflation_rate: inflation.pct(),
            }
            .clamped();
            let result = calculator.lump_sum(input.principal, input.annual_return, input.years, input.inflation_rate);
            write_series(series_csv, &result.yearly_data)?;
            if cli.json {
                return print_json(&result);
            }
            println!("Lump sum of {} at {}% for {} years", money(result.principal), result.annual_return, result.years);
            println!("  Maturity value: {}", money(result.maturity_value));
            println!("  Returns:        {}", money(result.total_returns));
            if let Some(real) = result.real_maturity_value {
                println!("  Real maturity:  {}", money(real));
            }
        }
        Command::Emi { loan, rate, tenure, inflation } => {
            let input = EmiInput {
                loan_amount: *loan,
                interest_rate: *rate,
                tenure: *tenure,
                inflation_rate: inflation.pct(),
            }
            .clamped();
            let result = calculator.emi(input.loan_amount, input.interest_rate, input.tenure, input.inflation_rate);
            write_series(series_csv, &result.breakdown)?;
            if cli.json {
                return print_json(&result);
            }
            println!("Loan of {} at {}% over {} years", money(result.loan_amount), result.interest_rate, result.tenure);
            println!("  EMI:            {}", money(result.emi));
            println!("  Total interest: {}", money(result.total_interest));
            println!("  Total payable:  {}", money(result.total_payable));
            if let Some(real) = result.real_emi {
                println!("  Real EMI:       {}", money(real));
            }
            println!("{:>5} {:>12} {:>12} {:>12} {:>14}", "Month", "EMI", "Principal", "Interest", "Balance");
            for row in result.breakdown.iter().take(12) {
                println!("{:>5} {:>12} {:>12} {:>12} {:>14}", row.month, money(row.emi), money(row.principal), money(row.interest), money(row.balance));
            }
        }
        Command::Cagr { initial, final_value, years, inflation } => {
            let input = CagrInput {
                initial_value: *initial,
                final_value: *final_value,
                years: *years,
                inflation_rate: inflation.pct(),
            }
            .clamped();
            let result = calculator.cagr(input.initial_value, input.final_value, input.years, input.inflation_rate);
            write_series(series_csv, &result.yearly_projection)?;
            if cli.json {
                return print_json(&result);
            }
            println!("{} to {} over {} years", money(result.initial_value), money(result.final_value), result.years);
            println!("  CAGR:           {:.2}%", result.cagr);
            println!("  Total growth:   {:.2}%", result.total_growth_percent);
            if let Some(real) = result.real_cagr {
                println!("  Real CAGR:      {:.2}%", real);
            }
        }
        Command::Xirr { csv } => {
            let flows = load_cash_flows(csv).with_context(|| format!("loading cash flows from {}", csv.display()))?;
            info!("loaded {} cash flows", flows.len());
            let result = xirr(&flows)?;
            write_series(series_csv, &result.cumulative_data)?;
            if cli.json {
                return print_json(&result);
            }
            println!("XIRR:            {:.2}% ({} iterations)", result.xirr, result.iterations);
            println!("  Invested:      {}", money(result.total_invested));
            println!("  Returned:      {}", money(result.total_returned));
            println!("  Net gain:      {} ({:.2}%)", money(result.net_gain), result.net_gain_percent);
            println!("  Duration:      {:.2} years", result.duration);
        }
        Command::Tax { country, jurisdiction_dir, income, deductions, default_deductions } => {
            let jurisdiction = match jurisdiction_dir {
                Some(dir) => load_jurisdiction(dir).with_context(|| format!("loading jurisdiction from {}", dir.display()))?,
                None => Jurisdiction::builtin(country).with_context(|| {
                    let known: Vec<String> = builtin_jurisdictions().into_iter().map(|j| j.code).collect();
                    format!("built-in jurisdictions: {}", known.join(", "))
                })?,
            };

            let mut claims = if *default_deductions { jurisdiction.default_claims() } else { BTreeMap::new() };
            claims.extend(deductions.iter().cloned());
            let claims = sanitize_claims(claims);
            let gross = income.unwrap_or_else(|| jurisdiction.default_gross_income());

            let result = calculate_income_tax(&jurisdiction, gross, &claims);
            write_series(series_csv, &result.tax_breakdown)?;
            if cli.json {
                return print_json(&result);
            }
            let local = Currency::find(&jurisdiction.currency_code).unwrap_or_else(|| currency.clone());
            let local_money = |amount: f64| format_currency(amount, &local);
            println!("{} income tax ({})", jurisdiction.name, jurisdiction.tax_year);
            println!("  Gross income:   {}", local_money(result.gross_income));
            println!("  Deductions:     {}", local_money(result.total_deductions));
            println!("  Taxable income: {}", local_money(result.taxable_income));
            println!("  Total tax:      {} ({:.2}% effective)", local_money(result.total_tax), result.effective_tax_rate);
            println!("  Net income:     {}", local_money(result.net_income));
            for slab in &result.tax_breakdown {
                let upper = slab.to.map_or_else(|| "and above".to_string(), |to| format!("to {}", local_money(to)));
                println!("    {} {} @ {}%: {}", local_money(slab.from), upper, slab.rate, local_money(slab.tax_on_slab));
            }
        }
        Command::Convert { amount, from, to, rates, history_days } => {
            let path = rates
                .clone()
                .or_else(|| settings.rates_file.clone())
                .ok_or_else(|| anyhow!("no rates file: pass --rates or set FIN_RATES_FILE"))?;
            let tables = StaticRateProvider::from_json_file(&path).with_context(|| format!("loading rates from {}", path.display()))?;
            let provider = CachedRateProvider::with_cache(tables, RateCache::with_ttl(Duration::seconds(settings.rate_cache_secs)));

            let result = convert(&provider, *amount, from, to)?;

            let history = history_days
                .map(|days| synthetic_history(result.rate, days, Utc::now().date_naive(), os_noise))
                .unwrap_or_default();
            write_series(series_csv, &history)?;

            if cli.json {
                #[derive(Serialize)]
                struct Output<'a> {
                    #[serde(flatten)]
                    conversion: &'a fin_toolkit::ConversionResult,
                    #[serde(skip_serializing_if = "Vec::is_empty")]
                    history: &'a Vec<fin_toolkit::currency::HistoricalRate>,
                }
                return print_json(&Output { conversion: &result, history: &history });
            }
            println!("{} {} = {:.2} {}", result.amount, result.from, result.converted_amount, result.to);
            println!("  1 {} = {} {}", result.from, format_exchange_rate(result.rate), result.to);
            println!("  1 {} = {} {}", result.to, format_exchange_rate(result.inverse_rate), result.from);
            if !result.last_updated.is_empty() {
                println!("  Rates as of {}", result.last_updated);
            }
            for point in &history {
                println!("    {} {}", point.date, format_exchange_rate(point.rate));
            }
        }
        Command::Sweep { monthly, principal, rates, years } => {
            let rows = sweep(*monthly, *principal, rates, years);
            write_series(series_csv, &rows)?;
            if cli.json {
                return print_json(&rows);
            }
            println!("{:>6} {:>5} {:>16} {:>16}", "Rate%", "Years", "SIP maturity", "Lump maturity");
            for row in &rows {
                println!(
                    "{:>6} {:>5} {:>16} {:>16}",
                    row.annual_return,
                    row.years,
                    format_currency_compact(row.sip_maturity, currency),
                    format_currency_compact(row.lump_sum_maturity, currency)
                );
            }
        }
        Command::Currency { .. } => bail!("currency is handled before calculators run"),
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct SweepRow {
    annual_return: f64,
    years: u32,
    sip_invested: f64,
    sip_maturity: f64,
    lump_sum_maturity: f64,
}

fn sweep(monthly: f64, principal: f64, rates: &[f64], years: &[u32]) -> Vec<SweepRow> {
    let grid: Vec<(f64, u32)> = rates.iter().flat_map(|&r| years.iter().map(move |&y| (r, y))).collect();
    info!("evaluating {} scenarios", grid.len());

    grid.par_iter()
        .map(|&(rate, years)| {
            let sip_input = SipInput { monthly_investment: monthly, annual_return: rate, years, inflation_rate: None }.clamped();
            let lump_input = LumpSumInput { principal, annual_return: rate, years, inflation_rate: None }.clamped();
            let sip_result = sip(sip_input.monthly_investment, sip_input.annual_return, sip_input.years, None);
            let lump_result = lump_sum(lump_input.principal, lump_input.annual_return, lump_input.years, None);
            SweepRow {
                annual_return: sip_input.annual_return,
                years: sip_input.years,
                sip_invested: sip_result.total_invested,
                sip_maturity: sip_result.maturity_value,
                lump_sum_maturity: lump_result.maturity_value,
            }
        })
        .collect()
}

fn run_currency(settings: &Settings, set: Option<&str>, list: bool, json: bool) -> Result<()> {
    let mut prefs = Preferences::load(&settings.prefs_path)
        .with_context(|| format!("reading {}", settings.prefs_path.display()))?;

    if let Some(code) = set {
        prefs.set_currency(code)?;
        prefs.save(&settings.prefs_path)
            .with_context(|| format!("writing {}", settings.prefs_path.display()))?;
        info!("stored display currency {}", prefs.currency);
    }

    if json {
        return print_json(&prefs.currency());
    }
    if list {
        for currency in supported_currencies() {
            let marker = if currency.code == prefs.currency { "*" } else { " " };
            println!("{} {} {} ({})", marker, currency.code, currency.name, currency.symbol);
        }
    } else {
        let current = prefs.currency();
        println!("{} {} ({})", current.code, current.name, current.symbol);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_series<T: Serialize>(path: Option<&Path>, rows: &[T]) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
