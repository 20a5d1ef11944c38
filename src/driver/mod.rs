//! Driver provider
//!
//! Creates and caches one automation session per platform:
//! - `capabilities` - capability objects for browsers and Appium
//! - `provider` - DriverProvider and the SessionFactory seam

pub mod capabilities;
pub mod provider;

pub use provider::{DriverProvider, SessionFactory, WireSessionFactory};

use crate::bridge::WebDriverError;
use crate::suite::{Platform, UnsupportedPlatform};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Cannot start {platform} session: {reason}")]
    SessionInit { platform: Platform, reason: String },

    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),
}
