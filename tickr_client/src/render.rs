//! Terminal rendering: the stock list, the ASCII price chart, and the
//! static banner/help text. Render functions build strings; the engine
//! decides when to print and flush them.
use crate::currency::CurrencyService;
use crate::state::Session;

/// Number of price-level rows in the chart (plus one for the base level).
const GRAPH_HEIGHT: usize = 10;

/// Format one amount in the display currency, falling back to the quote
/// currency when a code is not in the rate table.
pub fn format_price(
    amount: f64,
    quote_currency: &str,
    display_currency: &str,
    fx: &CurrencyService,
) -> String {
    let (value, code) = match fx.convert(amount, quote_currency, display_currency) {
        Some(converted) => (converted, display_currency),
        None => (amount, quote_currency),
    };
    if code == "USD" {
        format!("${:.2}", value)
    } else {
        format!("{:.2} {}", value, code)
    }
}

/// One line per cached symbol with converted price and change percent.
pub fn stock_list(session: &Session, fx: &CurrencyService) -> String {
    if session.is_empty() {
        return String::from("No stocks subscribed.\n");
    }
    let mut out = String::from("Subscribed stocks:\n");
    for (symbol, data) in session.snapshot() {
        out.push_str(&format!(
            "{}: {} ({:.2}% change)\n",
            symbol,
            format_price(data.current_price, &data.currency, session.display_currency(), fx),
            data.change_percent
        ));
    }
    out
}

/// ASCII chart of the local price history for `symbol`.
///
/// Prices are bucketed into `GRAPH_HEIGHT` equal-width bins between the
/// window's min and max; each column is one history entry in time order.
/// The top row's upper bound is opened up so the maximum lands in it.
pub fn price_graph(symbol: &str, session: &Session, fx: &CurrencyService) -> String {
    let Some(data) = session.get(symbol) else {
        return format!("No data available for {}\n", symbol);
    };
    if data.price_history.is_empty() {
        return format!("No data available for {}\n", symbol);
    }

    let prices: Vec<f64> = data
        .price_history
        .iter()
        .map(|p| {
            fx.convert(*p, &data.currency, session.display_currency())
                .unwrap_or(*p)
        })
        .collect();

    let min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max_price - min_price;

    let mut levels = vec![0.0; GRAPH_HEIGHT + 1];
    for (i, level) in levels.iter_mut().enumerate() {
        *level = min_price + range * i as f64 / GRAPH_HEIGHT as f64;
    }

    let mut out = format!("Stock Price Graph for {}:\n", symbol);
    for i in (0..=GRAPH_HEIGHT).rev() {
        out.push_str(&format!("{:>6.2} | ", levels[i]));
        let upper = if i == GRAPH_HEIGHT {
            max_price + 1.0
        } else {
            levels[i + 1]
        };
        for price in &prices {
            out.push(if *price >= levels[i] && *price < upper {
                '*'
            } else {
                ' '
            });
        }
        out.push('\n');
    }

    out.push_str("       ");
    for _ in &prices {
        out.push('-');
    }
    out.push_str("\n       Time ->\n");
    out
}

/// Command reference printed by `help`.
pub fn help_text() -> &'static str {
    "Commands:\n\
     \x20 subscribe <symbol>   - Subscribe to stock updates\n\
     \x20 unsubscribe <symbol> - Unsubscribe from stock\n\
     \x20 query <symbol>       - Get current price for a stock\n\
     \x20 graph <symbol>       - Show graph view of stock (price history needed)\n\
     \x20 history <symbol>     - Show price history of stock\n\
     \x20 list                 - Show all subscribed stocks\n\
     \x20 currency <code>      - Set the display currency\n\
     \x20 help                 - Show this help\n\
     \x20 clear                - Clears the terminal\n\
     \x20 exit                 - Exit application\n"
}

/// Safety-tip block printed together with the help text.
pub fn safety_tips() -> &'static str {
    "\nSafety Tips:\n\
     1. Always verify stock symbols before subscribing\n\
     2. Use 'query' to check prices before subscribing\n\
     3. Review 'history' to understand price volatility\n\
     4. Use 'list' regularly to track your subscriptions\n\
     5. Clear the screen with 'clear' if it gets cluttered\n\n"
}

/// Welcome banner shown at startup and after `clear`.
pub fn welcome_banner() -> &'static str {
    "=====================================\n\
     \x20 Welcome to TickrShell\n\
     =====================================\n\
     This program allows you to track stock prices in real time.\n\
     You can subscribe to stock updates, query the latest prices, or view price history graphs.\n\
     Type 'help' to see the list of available commands.\n\
     -------------------------------------\n"
}

/// Informational block about service cadence and local storage.
pub fn usage_costs() -> &'static str {
    "\nUsage Costs and Information:\n\
     ==============================\n\
     1. Data updates: Updates for subscribed stocks are provided every 8 seconds.\n\
     2. API Rate Limits: Maximum 100 queries per minute\n\
     3. Storage: The client keeps the 15 most recent prices per symbol in memory.\n\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickr_common::StockQuote;

    fn session_with(symbol: &str, prices: &[f64]) -> Session {
        let mut session = Session::new();
        for price in prices {
            session.upsert_quote(&StockQuote::new(symbol, *price));
        }
        session
    }

    #[test]
    fn empty_list_says_so() {
        let session = Session::new();
        assert_eq!(stock_list(&session, &CurrencyService::new()), "No stocks subscribed.\n");
    }

    #[test]
    fn list_shows_converted_prices() {
        let mut session = session_with("AAPL", &[100.0]);
        session.set_display_currency("EUR");
        let out = stock_list(&session, &CurrencyService::new());
        assert!(out.contains("AAPL: 92.00 EUR (0.00% change)"));
    }

    #[test]
    fn graph_without_data_prints_no_rows() {
        let session = Session::new();
        let out = price_graph("AAPL", &session, &CurrencyService::new());
        assert_eq!(out, "No data available for AAPL\n");

        let mut session = Session::new();
        session.track("AAPL");
        let out = price_graph("AAPL", &session, &CurrencyService::new());
        assert_eq!(out, "No data available for AAPL\n");
    }

    #[test]
    fn graph_with_single_price_has_one_star() {
        let session = session_with("AAPL", &[150.0]);
        let out = price_graph("AAPL", &session, &CurrencyService::new());

        let level_rows: Vec<&str> = out.lines().filter(|l| l.contains(" | ")).collect();
        assert_eq!(level_rows.len(), GRAPH_HEIGHT + 1);
        assert_eq!(out.matches('*').count(), 1);
        // The lone star sits in the top row (its upper bound is opened up).
        assert!(level_rows[0].contains('*'));
    }

    #[test]
    fn graph_places_extremes_in_bottom_and_top_rows() {
        let session = session_with("AAPL", &[10.0, 20.0]);
        let out = price_graph("AAPL", &session, &CurrencyService::new());

        let level_rows: Vec<&str> = out.lines().filter(|l| l.contains(" | ")).collect();
        // Rows print top-down: first row is the max level, last is the min.
        assert!(level_rows[0].starts_with(" 20.00"));
        assert!(level_rows[GRAPH_HEIGHT].starts_with(" 10.00"));

        let columns = |row: &str| row.split(" | ").nth(1).unwrap_or("").to_owned();
        assert_eq!(columns(level_rows[0]), " *");
        assert_eq!(columns(level_rows[GRAPH_HEIGHT]), "* ");
    }

    #[test]
    fn graph_axis_matches_history_width() {
        let session = session_with("AAPL", &[1.0, 2.0, 3.0]);
        let out = price_graph("AAPL", &session, &CurrencyService::new());
        assert!(out.contains("\n       ---\n"));
        assert!(out.ends_with("       Time ->\n"));
    }

    #[test]
    fn format_price_styles_usd_and_others() {
        let fx = CurrencyService::new();
        assert_eq!(format_price(150.0, "USD", "USD", &fx), "$150.00");
        assert_eq!(format_price(100.0, "USD", "EUR", &fx), "92.00 EUR");
        // Unknown quote currency renders unconverted.
        assert_eq!(format_price(5.0, "XYZ", "USD", &fx), "5.00 XYZ");
    }
}
