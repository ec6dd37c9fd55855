//! Error types for the console protocol core.

use crate::table::LogicalPort;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid parameter index: {0} (expected 0-160)")]
    InvalidParameterIndex(usize),

    #[error("Unknown parameter id: {0}")]
    UnknownParameterId(String),

    #[error("Invalid logical port: {0} (expected 1 or 2)")]
    InvalidLogicalPort(u8),

    #[error("Transport unavailable on {0}")]
    TransportUnavailable(LogicalPort),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
