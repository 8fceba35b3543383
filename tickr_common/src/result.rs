//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `TickrError`, so functions can simply return `Result<T>`.
use crate::error::TickrError;

/// Workspace-wide `Result` alias with `TickrError` as the default error.
pub type Result<T, E = TickrError> = std::result::Result<T, E>;
