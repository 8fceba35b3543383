//!
//! Common protocol types and transport plumbing shared by the TickrShell
//! client and anything speaking its bus protocol.
//!
//! This crate aggregates:
//! - `error` — unified error type `TickrError` used across the workspace.
//! - `result` — handy `Result<T, TickrError>` alias.
//! - `symbol` — ticker symbol format validation.
//! - `message` — the tagged message envelope exchanged with the DataService.
//! - `bus` — publish/subscribe socket pair used to move encoded frames.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod bus;
pub mod error;
pub mod message;
pub mod net;
pub mod result;
pub mod symbol;

pub use error::TickrError;
pub use message::{Message, StockQuote};
pub use result::Result;
