//! Currency and number formatting
//!
//! Whole-unit currency formatting follows the grouping and symbol conventions
//! of each supported locale. Pairs without a known convention fall back to
//! `symbol` + en-US grouped integer.

use serde::{Deserialize, Serialize};

/// A selectable display currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub locale: String,
}

impl Currency {
    pub fn new(code: &str, name: &str, symbol: &str, locale: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            locale: locale.to_string(),
        }
    }

    /// Find a supported currency by ISO code (case-insensitive)
    pub fn find(code: &str) -> Option<Self> {
        supported_currencies()
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("INR", "Indian Rupee", "₹", "en-IN")
    }
}

/// Currency codes offered for display, default first
pub const SUPPORTED_CURRENCIES: [&str; 10] =
    ["INR", "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "SGD"];

/// All supported display currencies, INR first
pub fn supported_currencies() -> Vec<Currency> {
    vec![
        Currency::default(),
        Currency::new("USD", "US Dollar", "$", "en-US"),
        Currency::new("EUR", "Euro", "€", "en-EU"),
        Currency::new("GBP", "British Pound", "£", "en-GB"),
        Currency::new("JPY", "Japanese Yen", "¥", "ja-JP"),
        Currency::new("CAD", "Canadian Dollar", "C$", "en-CA"),
        Currency::new("AUD", "Australian Dollar", "A$", "en-AU"),
        Currency::new("CHF", "Swiss Franc", "CHF", "de-CH"),
        Currency::new("CNY", "Chinese Yuan", "¥", "zh-CN"),
        Currency::new("SGD", "Singapore Dollar", "S$", "en-SG"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567 (lakh/crore)
    Indian,
}

/// How a locale writes a whole-unit amount of a given currency
#[derive(Debug, Clone, Copy)]
struct LocaleStyle {
    symbol: &'static str,
    separator: char,
    grouping: Grouping,
    /// Space between the symbol and the digits
    spaced: bool,
}

fn locale_style(locale: &str, code: &str) -> Option<LocaleStyle> {
    let style = |symbol, separator, grouping, spaced| {
        Some(LocaleStyle {
            symbol,
            separator,
            grouping,
            spaced,
        })
    };

    match (locale, code) {
        ("en-IN", "INR") => style("₹", ',', Grouping::Indian, false),
        ("en-US", "USD") => style("$", ',', Grouping::Thousands, false),
        ("en-GB", "GBP") => style("£", ',', Grouping::Thousands, false),
        ("en-CA", "CAD") => style("$", ',', Grouping::Thousands, false),
        ("en-AU", "AUD") => style("$", ',', Grouping::Thousands, false),
        ("en-SG", "SGD") => style("$", ',', Grouping::Thousands, false),
        ("ja-JP", "JPY") => style("￥", ',', Grouping::Thousands, false),
        ("zh-CN", "CNY") => style("¥", ',', Grouping::Thousands, false),
        ("de-CH", "CHF") => style("CHF", '’', Grouping::Thousands, true),
        _ => None,
    }
}

/// Format `amount` in `currency` with no decimal places
pub fn format_currency(amount: f64, currency: &Currency) -> String {
    match locale_style(&currency.locale, &currency.code) {
        Some(style) => {
            let rounded = amount.round();
            let digits = group_digits(rounded.abs(), style.separator, style.grouping);
            let sign = if rounded < 0.0 { "-" } else { "" };
            let space = if style.spaced { " " } else { "" };
            format!("{}{}{}{}", sign, style.symbol, space, digits)
        }
        None => format!("{}{}", currency.symbol, format_number(amount)),
    }
}

/// Rounded integer with en-US thousands separators. Halves round up, so
/// -2.5 becomes -2.
pub fn format_number(value: f64) -> String {
    let rounded = round_half_up(value);
    let digits = group_digits(rounded.abs(), ',', Grouping::Thousands);
    if rounded < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Abbreviated amount using crore/lakh/thousand suffixes.
///
/// The Cr/L/K convention is applied to every currency.
pub fn format_currency_compact(amount: f64, currency: &Currency) -> String {
    let symbol = &currency.symbol;
    if amount >= 10_000_000.0 {
        format!("{}{:.1}Cr", symbol, one_decimal(amount / 10_000_000.0))
    } else if amount >= 100_000.0 {
        format!("{}{:.1}L", symbol, one_decimal(amount / 100_000.0))
    } else if amount >= 1_000.0 {
        format!("{}{:.1}K", symbol, one_decimal(amount / 1_000.0))
    } else {
        format!("{}{:.0}", symbol, amount.round())
    }
}

/// Round to one decimal with ties away from zero; `{:.1}` alone rounds ties to even
fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Exchange rate with 4 decimals at or above 1, 6 below
pub fn format_exchange_rate(rate: f64) -> String {
    if rate >= 1.0 {
        format!("{:.4}", rate)
    } else {
        format!("{:.6}", rate)
    }
}

fn group_digits(value: f64, separator: char, grouping: Grouping) -> String {
    let raw = format!("{:.0}", value);
    let chars: Vec<char> = raw.chars().collect();
    let len = chars.len();

    let mut out = String::with_capacity(len + len / 2);
    for (i, ch) in chars.iter().enumerate() {
        let remaining = len - i;
        if i > 0 && needs_separator(remaining, grouping) {
            out.push(separator);
        }
        out.push(*ch);
    }
    out
}

/// Whether a separator goes before the digit with `remaining` digits left
fn needs_separator(remaining: usize, grouping: Grouping) -> bool {
    match grouping {
        Grouping::Thousands => remaining % 3 == 0,
        // Last three digits, then pairs
        Grouping::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
    }
}
