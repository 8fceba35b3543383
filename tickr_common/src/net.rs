//! Shared networking constants and helpers for the bus endpoints.

/// TCP port the client binds its publisher on (client -> service intents).
pub const CLIENT_PUB_PORT: u16 = 5556;
/// TCP port the DataService publishes updates on (service -> client).
pub const SERVICE_PUB_PORT: u16 = 5555;

/// Bounded receive timeout on the subscriber side, in milliseconds.
///
/// Keeps the receive loop responsive to the running flag; a timeout is a
/// normal "no message this tick" outcome, never an error.
pub const RECV_TIMEOUT_MS: u64 = 1000;

/// Helper to format an address with a port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}
