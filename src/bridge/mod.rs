//! Bridge to the automation servers
//!
//! Every platform is driven over the W3C WebDriver wire protocol:
//! - browsers through chromedriver / geckodriver / msedgedriver
//! - Android and iOS apps through an Appium server
//!
//! [`Session`] is the seam the rest of the crate talks through. The
//! `webdriver` module implements it over HTTP; tests substitute a fake.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::interaction::Locator;

pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

pub use webdriver::{parse_response, WebDriverClient, WireSession};

/// JSON key of a W3C element reference
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Error codes defined by the W3C WebDriver specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    NoSuchElement,
    StaleElementReference,
    ElementClickIntercepted,
    ElementNotInteractable,
    InvalidElementState,
    InvalidSelector,
    InvalidArgument,
    JavascriptError,
    Timeout,
    ScriptTimeout,
    InvalidSessionId,
    SessionNotCreated,
    UnknownCommand,
    UnsupportedOperation,
    UnknownError,
    Other(String),
}

impl ErrorCode {
    pub fn from_w3c(code: &str) -> Self {
        match code {
            "no such element" => ErrorCode::NoSuchElement,
            "stale element reference" => ErrorCode::StaleElementReference,
            "element click intercepted" => ErrorCode::ElementClickIntercepted,
            "element not interactable" => ErrorCode::ElementNotInteractable,
            "invalid element state" => ErrorCode::InvalidElementState,
            "invalid selector" => ErrorCode::InvalidSelector,
            "invalid argument" => ErrorCode::InvalidArgument,
            "javascript error" => ErrorCode::JavascriptError,
            "timeout" => ErrorCode::Timeout,
            "script timeout" => ErrorCode::ScriptTimeout,
            "invalid session id" => ErrorCode::InvalidSessionId,
            "session not created" => ErrorCode::SessionNotCreated,
            "unknown command" | "unknown method" => ErrorCode::UnknownCommand,
            "unsupported operation" => ErrorCode::UnsupportedOperation,
            "unknown error" => ErrorCode::UnknownError,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NoSuchElement => "no such element",
            ErrorCode::StaleElementReference => "stale element reference",
            ErrorCode::ElementClickIntercepted => "element click intercepted",
            ErrorCode::ElementNotInteractable => "element not interactable",
            ErrorCode::InvalidElementState => "invalid element state",
            ErrorCode::InvalidSelector => "invalid selector",
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::JavascriptError => "javascript error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::ScriptTimeout => "script timeout",
            ErrorCode::InvalidSessionId => "invalid session id",
            ErrorCode::SessionNotCreated => "session not created",
            ErrorCode::UnknownCommand => "unknown command",
            ErrorCode::UnsupportedOperation => "unsupported operation",
            ErrorCode::UnknownError => "unknown error",
            ErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the automation server or the transport to it
#[derive(Debug, thiserror::Error)]
pub enum WebDriverError {
    #[error("Cannot reach automation server at {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("{code}: {message}")]
    Command { code: ErrorCode, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl WebDriverError {
    pub fn command(code: ErrorCode, message: impl Into<String>) -> Self {
        WebDriverError::Command {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            WebDriverError::Command { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The session cannot be used any more; retrying another strategy is pointless
    pub fn is_session_fatal(&self) -> bool {
        match self {
            WebDriverError::Connection { .. } => true,
            WebDriverError::Command { code, .. } => matches!(
                code,
                ErrorCode::InvalidSessionId | ErrorCode::SessionNotCreated
            ),
            _ => false,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.code() == Some(&ErrorCode::StaleElementReference)
    }

    pub fn is_no_such_element(&self) -> bool {
        self.code() == Some(&ErrorCode::NoSuchElement)
    }
}

/// Server-side handle of a located element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub id: String,
}

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Element reference as passed in script arguments
    pub fn to_json(&self) -> Value {
        serde_json::json!({ ELEMENT_KEY: self.id })
    }

    /// Accepts W3C references and the legacy `ELEMENT` key some Appium drivers return
    pub fn from_json(value: &Value) -> Option<Self> {
        value
            .get(ELEMENT_KEY)
            .or_else(|| value.get("ELEMENT"))
            .and_then(|v| v.as_str())
            .map(ElementRef::new)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// One live automation session
#[async_trait]
pub trait Session: Send + Sync {
    fn id(&self) -> &str;

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, WebDriverError>;

    async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError>;

    async fn clear(&self, element: &ElementRef) -> Result<(), WebDriverError>;

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError>;

    async fn text(&self, element: &ElementRef) -> Result<String, WebDriverError>;

    async fn attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, WebDriverError>;

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, WebDriverError>;

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool, WebDriverError>;

    async fn execute_script(&self, script: &str, args: Vec<Value>)
        -> Result<Value, WebDriverError>;

    async fn navigate(&self, url: &str) -> Result<(), WebDriverError>;

    async fn current_url(&self) -> Result<String, WebDriverError>;

    async fn window_size(&self) -> Result<WindowSize, WebDriverError>;

    async fn maximize_window(&self) -> Result<(), WebDriverError>;

    /// Dispatch W3C input source actions
    async fn perform_actions(&self, actions: Value) -> Result<(), WebDriverError>;

    async fn release_actions(&self) -> Result<(), WebDriverError>;

    /// PNG screenshot of the current viewport
    async fn screenshot(&self) -> Result<Vec<u8>, WebDriverError>;

    /// End the session on the server
    async fn quit(&self) -> Result<(), WebDriverError>;
}
