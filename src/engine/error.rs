//! Scenario error types

use super::ledger::LedgerError;
use crate::driver::DriverError;
use crate::interaction::InteractionError;
use crate::suite::{ConfigError, UnsupportedPlatform};

/// Errors that end a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("No live session; run the before hook first")]
    NoSession,

    #[error("Report error: {0}")]
    Ledger(#[from] LedgerError),
}
