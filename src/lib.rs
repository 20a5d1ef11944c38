//! # Planity E2E
//!
//! End-to-end UI tests for the Planity booking site and mobile apps, driven
//! over the W3C WebDriver protocol.
//!
//! ## Features
//!
//! - **One API for three platforms** - Web (chromedriver, geckodriver, msedgedriver), Android and iOS (Appium)
//! - **Resilient interactions** - Bounded waits and an ordered click escalation
//! - **Page objects** - Planity locators per platform
//! - **Step ledger** - Every step recorded, JSON report and failure screenshots
//!
//! ## Layers
//!
//! - `suite`: configuration, platform selection, the per-scenario `TestContext`
//! - `bridge`: the `Session` trait and its HTTP implementation
//! - `driver`: one cached session per platform
//! - `interaction`: waits, clicks, typing, scrolling and gestures
//! - `pages`: Planity page objects
//! - `engine`: scenario lifecycle, steps and the ledger
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use planity_e2e::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load_default()?.with_env_overrides();
//!     let provider = Arc::new(DriverProvider::new(config));
//!
//!     let mut runner = ScenarioRunner::new(provider);
//!     runner.before("Recherche de coiffeurs").await?;
//!     let outcome = PlanitySteps::hairdresser_search(&mut runner, "Paris").await;
//!     runner.after(outcome.is_err()).await;
//!
//!     outcome?;
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod driver;
pub mod engine;
pub mod interaction;
pub mod pages;
pub mod suite;

// Re-export main types
pub use bridge::{ElementRef, ErrorCode, Session, WebDriverClient, WebDriverError, WireSession};
pub use driver::{DriverError, DriverProvider, SessionFactory, WireSessionFactory};
pub use engine::{
    Ledger, LedgerError, PlanitySteps, ScenarioError, ScenarioRunner, StepRecord, StepStatus,
};
pub use interaction::{
    first_success, ops_for, ClickTier, Condition, Escalation, InteractionError, Interactor,
    Locator, Lookup, PlatformLocator, PlatformOps, Strategy, WaitPolicy, WaitProfile,
};
pub use pages::{ConsentBanner, PlanityPage};
pub use suite::{
    Browser, ConfigError, ConfigLoader, Platform, PlatformSelector, SuiteConfig, TestContext,
    UnsupportedPlatform,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::{Session, WebDriverError};
    pub use crate::driver::{DriverError, DriverProvider};
    pub use crate::engine::{Ledger, PlanitySteps, ScenarioError, ScenarioRunner, StepStatus};
    pub use crate::interaction::{
        InteractionError, Interactor, Locator, PlatformLocator, WaitPolicy,
    };
    pub use crate::pages::{ConsentBanner, PlanityPage};
    pub use crate::suite::{
        ConfigLoader, Platform, PlatformSelector, SuiteConfig, TestContext,
    };
}
