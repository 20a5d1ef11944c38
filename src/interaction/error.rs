use std::time::Duration;

use super::wait::Condition;
use super::Locator;
use crate::bridge::WebDriverError;
use crate::suite::Platform;

/// A failed strategy inside a click escalation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: String,
    pub error: String,
}

/// Errors surfaced to page objects
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("Timed out after {timeout:?} waiting for {locator} to be {condition}{}", suffix(.context))]
    Timeout {
        locator: Locator,
        condition: Condition,
        timeout: Duration,
        context: Option<String>,
    },

    #[error("No element matches {locator}{}", suffix(.context))]
    NotFound {
        locator: Locator,
        context: Option<String>,
    },

    #[error("Element {locator} is not clickable after {} attempts{}", .attempts.len(), suffix(.context))]
    NotClickable {
        locator: Locator,
        context: Option<String>,
        attempts: Vec<Attempt>,
    },

    #[error("Cannot type into {locator}{}: {source}", suffix(.context))]
    Input {
        locator: Locator,
        context: Option<String>,
        #[source]
        source: Box<InteractionError>,
    },

    #[error("Cannot scroll to {locator}: {source}")]
    Scroll {
        locator: Locator,
        #[source]
        source: Box<InteractionError>,
    },

    #[error("Gesture failed{}: {source}", suffix(.context))]
    Gesture {
        context: Option<String>,
        #[source]
        source: Box<InteractionError>,
    },

    #[error("No locator for {element} on {platform}")]
    NoLocator { element: String, platform: Platform },

    #[error("Page not ready after {timeout:?} (readyState: {state})")]
    PageNotReady { timeout: Duration, state: String },

    #[error("Driver error: {0}")]
    Driver(#[from] WebDriverError),
}

fn suffix(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" ({})", context),
        None => String::new(),
    }
}

impl InteractionError {
    /// The underlying session is gone; no other strategy can succeed
    pub fn is_session_fatal(&self) -> bool {
        match self {
            InteractionError::Driver(e) => e.is_session_fatal(),
            InteractionError::Input { source, .. }
            | InteractionError::Scroll { source, .. }
            | InteractionError::Gesture { source, .. } => source.is_session_fatal(),
            _ => false,
        }
    }

    pub fn locator(&self) -> Option<&Locator> {
        match self {
            InteractionError::Timeout { locator, .. }
            | InteractionError::NotFound { locator, .. }
            | InteractionError::NotClickable { locator, .. }
            | InteractionError::Input { locator, .. }
            | InteractionError::Scroll { locator, .. } => Some(locator),
            InteractionError::Gesture { source, .. } => source.locator(),
            InteractionError::NoLocator { .. }
            | InteractionError::PageNotReady { .. }
            | InteractionError::Driver(_) => None,
        }
    }
}
