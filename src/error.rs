//! Unified error types for the prop controller firmware.
//!
//! The sequencing core has no failure modes of its own; errors only
//! appear at the edges (configuration, pin writes, the network task).
//! Every edge error converts into the top-level [`Error`] so the entry
//! point handles them uniformly.  All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// An actuator or relay output could not be driven.
    Drive(DriveError),
    /// The network transport failed.
    Net(NetError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Drive(e) => write!(f, "drive: {e}"),
            Self::Net(e) => write!(f, "net: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No configuration document available.
    NotFound,
    /// The document is not valid JSON for [`PropConfig`](crate::config::PropConfig).
    Corrupted,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Drive errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveError {
    /// A GPIO write to the named output failed.
    PinWrite(&'static str),
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinWrite(pin) => write!(f, "write to {pin} failed"),
        }
    }
}

impl From<DriveError> for Error {
    fn from(e: DriveError) -> Self {
        Self::Drive(e)
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    BindFailed,
    ReadFailed,
    WriteFailed,
    /// The request did not fit the receive buffer.
    RequestTooLarge,
    /// The I/O thread could not be started.
    SpawnFailed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "listener bind failed"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::RequestTooLarge => write!(f, "request too large"),
            Self::SpawnFailed => write!(f, "I/O thread spawn failed"),
        }
    }
}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}
