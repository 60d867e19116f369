//! Domain error type shared by the stateful core.
//!
//! The TUI loop itself reports through `color_eyre`; these variants cover the
//! few operations that can refuse their input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimorError {
    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("insufficient funds: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("unknown server: {id}")]
    UnknownServer { id: u32 },

    #[error("cannot change server while {status}")]
    ServerLocked { status: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, TimorError>;
