//! Suite types and definitions
//!
//! This module contains the types a test run is configured with:
//! - `platform` - Platform, Browser and the PlatformSelector
//! - `config` - SuiteConfig with web and mobile capability settings
//! - `loader` - Load configuration from `.properties` or YAML files
//! - `context` - TestContext threaded through pages and interactions

pub mod config;
pub mod context;
pub mod loader;
pub mod platform;

pub use config::{AndroidConfig, IosConfig, SuiteConfig, WaitConfig, PLANITY_URL};
pub use context::TestContext;
pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_PATHS};
pub use platform::{Browser, Platform, PlatformSelector, UnsupportedPlatform};
