//! Local per-symbol cache with a bounded price-history window.
//!
//! The `Session` owns the symbol -> `StockData` mapping and the user-selected
//! display currency. It is written by both the input loop (`unsubscribe`,
//! `currency`) and the receive loop (every inbound data event), so the engine
//! keeps it behind a mutex; the store itself is plain in-memory state.
use std::collections::{HashMap, VecDeque};

use tickr_common::StockQuote;

/// Capacity of the per-symbol price history; the oldest price is evicted
/// once a sixteenth arrives.
pub const MAX_HISTORY: usize = 15;

/// Cached view of one tracked symbol.
#[derive(Debug, Clone)]
pub struct StockData {
    /// Last observed price, in `currency`.
    pub current_price: f64,
    /// Last observed percent change versus the service's reference.
    pub change_percent: f64,
    /// Currency the cached prices are denominated in.
    pub currency: String,
    /// Recent prices, oldest first, at most [`MAX_HISTORY`] entries.
    pub price_history: VecDeque<f64>,
}

impl Default for StockData {
    fn default() -> Self {
        StockData {
            current_price: 0.0,
            change_percent: 0.0,
            currency: String::from("USD"),
            price_history: VecDeque::new(),
        }
    }
}

/// Process-wide session state: the cache plus the display currency.
#[derive(Debug)]
pub struct Session {
    stocks: HashMap<String, StockData>,
    display_currency: String,
}

impl Session {
    /// Fresh session with an empty cache and USD display currency.
    pub fn new() -> Self {
        Session {
            stocks: HashMap::new(),
            display_currency: String::from("USD"),
        }
    }

    /// Apply one quote observation: create the entry if absent, refresh the
    /// latest fields, and append the price to the bounded history.
    pub fn upsert_quote(&mut self, quote: &StockQuote) {
        let data = self.stocks.entry(quote.symbol.clone()).or_default();
        data.current_price = quote.price;
        data.change_percent = quote.change_percent.unwrap_or(0.0);
        data.currency = quote.currency.clone();
        data.price_history.push_back(quote.price);
        if data.price_history.len() > MAX_HISTORY {
            data.price_history.pop_front();
        }
    }

    /// Replace the accumulated history window with a service-delivered
    /// series, keeping only the newest [`MAX_HISTORY`] prices in order.
    pub fn replace_history(&mut self, symbol: &str, quotes: &[StockQuote]) {
        let data = self.stocks.entry(String::from(symbol)).or_default();
        data.price_history.clear();
        for quote in quotes {
            data.price_history.push_back(quote.price);
        }
        while data.price_history.len() > MAX_HISTORY {
            data.price_history.pop_front();
        }
    }

    /// Start tracking `symbol` with a default entry. Returns `true` when the
    /// symbol was newly added, `false` when it was already tracked.
    pub fn track(&mut self, symbol: &str) -> bool {
        if self.stocks.contains_key(symbol) {
            return false;
        }
        self.stocks.insert(String::from(symbol), StockData::default());
        true
    }

    /// Recreate default entries for a replayed subscription set and return
    /// the symbols that were newly added. Calling it twice with the same
    /// list leaves the cache unchanged after the first call.
    pub fn restore(&mut self, symbols: &[String]) -> Vec<String> {
        symbols
            .iter()
            .filter(|symbol| self.track(symbol.as_str()))
            .cloned()
            .collect()
    }

    /// Remove `symbol` from the cache if present.
    pub fn forget(&mut self, symbol: &str) -> bool {
        self.stocks.remove(symbol).is_some()
    }

    /// Membership test.
    pub fn is_tracked(&self, symbol: &str) -> bool {
        self.stocks.contains_key(symbol)
    }

    /// Cached data for one symbol.
    pub fn get(&self, symbol: &str) -> Option<&StockData> {
        self.stocks.get(symbol)
    }

    /// Iterator over the cache for rendering.
    pub fn snapshot(&self) -> impl Iterator<Item = (&str, &StockData)> {
        self.stocks.iter().map(|(symbol, data)| (symbol.as_str(), data))
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Currency code every price print is converted into.
    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    /// Select the display currency.
    pub fn set_display_currency(&mut self, code: &str) {
        self.display_currency = String::from(code);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, price: f64) -> StockQuote {
        StockQuote::new(symbol, price)
    }

    #[test]
    fn upsert_creates_and_refreshes() {
        let mut session = Session::new();
        session.upsert_quote(&StockQuote {
            symbol: String::from("AAPL"),
            price: 150.0,
            change_percent: Some(1.2),
            currency: String::from("USD"),
        });

        let data = session.get("AAPL").unwrap();
        assert_eq!(data.current_price, 150.0);
        assert_eq!(data.change_percent, 1.2);
        assert_eq!(data.price_history.back(), Some(&150.0));
        assert_eq!(data.price_history.len(), 1);
    }

    #[test]
    fn history_is_capped_at_the_newest_fifteen() {
        let mut session = Session::new();
        for i in 0..16 {
            session.upsert_quote(&quote("AAPL", 100.0 + i as f64));
        }

        let data = session.get("AAPL").unwrap();
        assert_eq!(data.price_history.len(), MAX_HISTORY);
        // Oldest (100.0) evicted; the window is the last 15 in order.
        assert_eq!(data.price_history.front(), Some(&101.0));
        assert_eq!(data.price_history.back(), Some(&115.0));
        assert_eq!(data.current_price, 115.0);
    }

    #[test]
    fn replace_history_truncates_keeping_the_newest() {
        let mut session = Session::new();
        let series: Vec<StockQuote> = (0..20).map(|i| quote("AAPL", i as f64)).collect();
        session.replace_history("AAPL", &series);

        let data = session.get("AAPL").unwrap();
        assert_eq!(data.price_history.len(), MAX_HISTORY);
        assert_eq!(data.price_history.front(), Some(&5.0));
        assert_eq!(data.price_history.back(), Some(&19.0));
    }

    #[test]
    fn replace_history_discards_the_accumulated_window() {
        let mut session = Session::new();
        session.upsert_quote(&quote("AAPL", 1.0));
        session.upsert_quote(&quote("AAPL", 2.0));
        session.replace_history("AAPL", &[quote("AAPL", 9.0)]);

        let data = session.get("AAPL").unwrap();
        assert_eq!(data.price_history, VecDeque::from(vec![9.0]));
    }

    #[test]
    fn restore_is_idempotent_and_reports_additions() {
        let mut session = Session::new();
        let symbols = vec![String::from("AAPL"), String::from("MSFT")];

        let added = session.restore(&symbols);
        assert_eq!(added, symbols);
        assert_eq!(session.len(), 2);

        let added_again = session.restore(&symbols);
        assert!(added_again.is_empty());
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn restore_does_not_clobber_existing_data() {
        let mut session = Session::new();
        session.upsert_quote(&quote("AAPL", 150.0));
        session.restore(&[String::from("AAPL")]);
        assert_eq!(session.get("AAPL").unwrap().current_price, 150.0);
    }

    #[test]
    fn forget_removes_membership() {
        let mut session = Session::new();
        session.track("AAPL");
        assert!(session.is_tracked("AAPL"));
        assert!(session.forget("AAPL"));
        assert!(!session.is_tracked("AAPL"));
        assert!(!session.forget("AAPL"));
    }

    #[test]
    fn track_is_ack_shaped() {
        let mut session = Session::new();
        assert!(session.track("GOOGL"));
        assert!(!session.track("GOOGL"));
        assert!(session.get("GOOGL").unwrap().price_history.is_empty());
    }
}
