//! Message envelope exchanged between TickrShell and the DataService.
//!
//! Every frame on the bus carries exactly one `Message`, encoded as a
//! self-describing JSON object whose `type` field names the variant.
//! Optional payload fields are omitted when absent, so decode(encode(m))
//! reproduces `m` for every well-formed message.
use serde::{Deserialize, Serialize};

use crate::error::TickrError;

/// One price observation for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    /// Ticker symbol this quote is for (e.g., `AAPL`).
    pub symbol: String,
    /// Last traded price, in the quote currency.
    pub price: f64,
    /// Percent change versus the service's reference price, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    /// ISO-like 3-letter currency code; `USD` when the service omits it.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    String::from("USD")
}

impl StockQuote {
    /// Creates a quote priced in USD with no reference change.
    pub fn new(symbol: &str, price: f64) -> Self {
        StockQuote {
            symbol: String::from(symbol),
            price,
            change_percent: None,
            currency: default_currency(),
        }
    }
}

/// Tagged message envelope for the client/service bus.
///
/// Outbound variants carry user intents; inbound variants carry updates,
/// responses, and the subscription restoration replay. The `Subscribe`
/// variant travels both ways: the client sends the request and the service
/// echoes it back as the authoritative acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Request a standing subscription for `symbol`; echoed back as an ack.
    Subscribe {
        /// Target ticker symbol.
        symbol: String,
    },
    /// Drop the standing subscription for `symbol`.
    Unsubscribe {
        /// Target ticker symbol.
        symbol: String,
    },
    /// One-shot spot price request; answered with a `QuoteUpdate`.
    Query {
        /// Target ticker symbol.
        symbol: String,
    },
    /// Ask the service for the stored price series of `symbol`.
    RequestPriceHistory {
        /// Target ticker symbol.
        symbol: String,
    },
    /// Ask the service to replay the persisted subscription set.
    RequestSubscriptions,
    /// A fresh quote, pushed for subscriptions or in reply to a `Query`.
    QuoteUpdate {
        /// The observed quote.
        quote: StockQuote,
    },
    /// The stored price series for one symbol, oldest first.
    PriceHistoryResponse {
        /// Symbol the series belongs to.
        symbol: String,
        /// Quotes in delivery order, oldest first.
        #[serde(rename = "priceHistory")]
        price_history: Vec<StockQuote>,
    },
    /// Replay of the persisted subscription set.
    SubscriptionsList {
        /// Every symbol the service holds a subscription for.
        subscriptions: Vec<String>,
    },
    /// Human-readable failure report from the service.
    Error {
        /// The service's message, printed verbatim for the user.
        error: String,
    },
}

impl Message {
    /// Creates a new `Subscribe` request.
    pub fn subscribe(symbol: &str) -> Self {
        Message::Subscribe {
            symbol: String::from(symbol),
        }
    }

    /// Creates a new `Unsubscribe` request.
    pub fn unsubscribe(symbol: &str) -> Self {
        Message::Unsubscribe {
            symbol: String::from(symbol),
        }
    }

    /// Creates a new one-shot `Query` request.
    pub fn query(symbol: &str) -> Self {
        Message::Query {
            symbol: String::from(symbol),
        }
    }

    /// Creates a new `RequestPriceHistory` request.
    pub fn request_price_history(symbol: &str) -> Self {
        Message::RequestPriceHistory {
            symbol: String::from(symbol),
        }
    }

    /// Creates a new `RequestSubscriptions` request.
    pub fn request_subscriptions() -> Self {
        Message::RequestSubscriptions
    }

    /// Encode the message to JSON bytes for one bus frame.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TickrError> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }

    /// Decode one bus frame back into a message.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TickrError> {
        let msg = serde_json::from_slice(bytes)?;
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(msg: Message) {
        let bytes = msg.to_json_bytes().unwrap();
        let decoded = Message::from_json_bytes(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn every_variant_round_trips() {
        round_trip(Message::subscribe("AAPL"));
        round_trip(Message::unsubscribe("AAPL"));
        round_trip(Message::query("MSFT"));
        round_trip(Message::request_price_history("MSFT"));
        round_trip(Message::request_subscriptions());
        round_trip(Message::QuoteUpdate {
            quote: StockQuote {
                symbol: String::from("GOOGL"),
                price: 181.25,
                change_percent: Some(-0.4),
                currency: String::from("EUR"),
            },
        });
        round_trip(Message::PriceHistoryResponse {
            symbol: String::from("AMZN"),
            price_history: vec![
                StockQuote::new("AMZN", 210.0),
                StockQuote::new("AMZN", 211.5),
            ],
        });
        round_trip(Message::SubscriptionsList {
            subscriptions: vec![String::from("AAPL"), String::from("META")],
        });
        round_trip(Message::Error {
            error: String::from("Unknown symbol: FOOBA"),
        });
    }

    #[test]
    fn type_tag_names_the_variant() {
        let bytes = Message::request_subscriptions().to_json_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "RequestSubscriptions");

        let bytes = Message::subscribe("AAPL").to_json_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "Subscribe");
        assert_eq!(json["symbol"], "AAPL");
    }

    #[test]
    fn absent_change_percent_stays_absent() {
        let msg = Message::QuoteUpdate {
            quote: StockQuote::new("AAPL", 150.0),
        };
        let bytes = msg.to_json_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["quote"].get("change_percent").is_none());

        match Message::from_json_bytes(&bytes).unwrap() {
            Message::QuoteUpdate { quote } => assert_eq!(quote.change_percent, None),
            other => panic!("Expected QuoteUpdate, got {:?}", other),
        }
    }

    #[test]
    fn present_change_percent_stays_present() {
        let msg = Message::QuoteUpdate {
            quote: StockQuote {
                symbol: String::from("AAPL"),
                price: 150.0,
                change_percent: Some(0.0),
                currency: String::from("USD"),
            },
        };
        let bytes = msg.to_json_bytes().unwrap();
        match Message::from_json_bytes(&bytes).unwrap() {
            Message::QuoteUpdate { quote } => assert_eq!(quote.change_percent, Some(0.0)),
            other => panic!("Expected QuoteUpdate, got {:?}", other),
        }
    }

    #[test]
    fn missing_currency_defaults_to_usd() {
        let frame = br#"{"type":"QuoteUpdate","quote":{"symbol":"TSLA","price":200.0}}"#;
        match Message::from_json_bytes(frame).unwrap() {
            Message::QuoteUpdate { quote } => {
                assert_eq!(quote.currency, "USD");
                assert_eq!(quote.change_percent, None);
            }
            other => panic!("Expected QuoteUpdate, got {:?}", other),
        }
    }

    #[test]
    fn history_response_uses_camel_case_field() {
        let msg = Message::PriceHistoryResponse {
            symbol: String::from("AAPL"),
            price_history: vec![StockQuote::new("AAPL", 150.0)],
        };
        let bytes = msg.to_json_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get("priceHistory").is_some());
    }

    #[test]
    fn unknown_tag_is_a_decode_error_not_a_panic() {
        let frame = br#"{"type":"PortfolioUpdate","symbol":"AAPL"}"#;
        assert!(Message::from_json_bytes(frame).is_err());
    }

    #[test]
    fn garbage_frame_is_a_decode_error() {
        assert!(Message::from_json_bytes(b"not json at all").is_err());
    }
}
