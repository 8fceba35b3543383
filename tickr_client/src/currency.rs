//! Display-currency conversion for price rendering.
//!
//! Quotes arrive denominated in their own currency; every price print goes
//! through [`CurrencyService::convert`] into the session's display currency.
//! The rate table is fixed and USD-based; conversion between two non-USD
//! codes pivots through USD.
use std::collections::HashMap;

/// Fixed-rate converter between supported currency codes.
#[derive(Debug, Clone)]
pub struct CurrencyService {
    /// Units of each currency per one USD.
    rates: HashMap<String, f64>,
}

impl CurrencyService {
    /// Converter with the built-in rate table.
    pub fn new() -> Self {
        let rates = [
            ("USD", 1.0),
            ("EUR", 0.92),
            ("GBP", 0.79),
            ("JPY", 149.50),
            ("CHF", 0.88),
            ("CAD", 1.36),
            ("AUD", 1.52),
        ]
        .into_iter()
        .map(|(code, rate)| (String::from(code), rate))
        .collect();
        Self { rates }
    }

    /// Whether `code` is in the rate table.
    pub fn supports(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Convert `amount` from one currency to another through the USD pivot.
    /// Returns `None` when either code is unknown.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Option<f64> {
        if from == to {
            return Some(amount);
        }
        let from_rate = self.rates.get(from)?;
        let to_rate = self.rates.get(to)?;
        Some(amount / from_rate * to_rate)
    }

    /// Supported codes, sorted for stable error messages.
    pub fn supported_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
