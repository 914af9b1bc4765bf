//! Error types for setup and configuration.
//!
//! The simulation itself never fails: out-of-range lookups resolve to
//! sentinel cells. Errors only surface where external input enters.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
