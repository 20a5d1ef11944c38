//! Suite configuration
//!
//! Configuration for a test run, loaded once at scenario setup from
//! `config/configuration.properties` or a YAML file:
//!
//! ```yaml
//! platformName: Web
//! browser: chrome
//! headless: true
//! waits:
//!   defaultMs: 15000
//! android:
//!   deviceName: emulator-5554
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::platform::{Browser, Platform, UnsupportedPlatform};
use crate::interaction::WaitPolicy;

pub const PLANITY_URL: &str = "https://www.planity.com/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    /// Target platform name (Web, Android, iOS)
    #[serde(default = "default_platform_name")]
    pub platform_name: String,

    /// Browser backend for web runs (chrome, firefox, edge)
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Site root opened by the launch step
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Browser driver server (chromedriver, geckodriver, msedgedriver)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Appium server for Android and iOS
    #[serde(default = "default_appium_url")]
    pub appium_url: String,

    /// Run the browser headless
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// HTTP timeout for a single wire command, in milliseconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,

    /// Where the step ledger and failure screenshots are written
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    #[serde(default)]
    pub waits: WaitConfig,

    #[serde(default)]
    pub android: AndroidConfig,

    #[serde(default)]
    pub ios: IosConfig,
}

fn default_platform_name() -> String {
    "Web".to_string()
}

fn default_browser() -> String {
    "chrome".to_string()
}

fn default_base_url() -> String {
    PLANITY_URL.to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_appium_url() -> String {
    "http://127.0.0.1:4723".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_command_timeout() -> u64 {
    120_000
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("target/planity")
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            platform_name: default_platform_name(),
            browser: default_browser(),
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            appium_url: default_appium_url(),
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            command_timeout_ms: default_command_timeout(),
            report_dir: default_report_dir(),
            waits: WaitConfig::default(),
            android: AndroidConfig::default(),
            ios: IosConfig::default(),
        }
    }
}

impl SuiteConfig {
    pub fn platform(&self) -> Result<Platform, UnsupportedPlatform> {
        self.platform_name.parse()
    }

    pub fn browser(&self) -> Result<Browser, String> {
        self.browser.parse()
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        self.waits.to_policy()
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Automation server a platform's sessions are created on
    pub fn server_url(&self, platform: Platform) -> &str {
        match platform {
            Platform::Web => &self.webdriver_url,
            Platform::Android | Platform::Ios => &self.appium_url,
        }
    }

    /// Apply `PLANITY_PLATFORM` / `PLANITY_BROWSER` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(platform) = std::env::var("PLANITY_PLATFORM") {
            self.platform_name = platform;
        }
        if let Ok(browser) = std::env::var("PLANITY_BROWSER") {
            self.browser = browser;
        }
        self
    }
}

// ============================================================================
// Wait timeouts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaitConfig {
    pub short_ms: u64,
    pub default_ms: u64,
    pub long_ms: u64,
    pub poll_ms: u64,
    /// Wait for each consent-banner button
    pub consent_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            short_ms: 5_000,
            default_ms: 15_000,
            long_ms: 30_000,
            poll_ms: 500,
            consent_ms: 10_000,
        }
    }
}

impl WaitConfig {
    pub fn to_policy(&self) -> WaitPolicy {
        WaitPolicy {
            short: Duration::from_millis(self.short_ms),
            default: Duration::from_millis(self.default_ms),
            long: Duration::from_millis(self.long_ms),
            poll_interval: Duration::from_millis(self.poll_ms),
        }
    }

    pub fn consent(&self) -> Duration {
        Duration::from_millis(self.consent_ms)
    }
}

// ============================================================================
// Mobile capabilities
// ============================================================================

/// Appium capabilities for the Android app
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AndroidConfig {
    pub platform_version: String,
    pub device_name: String,
    pub automation_name: String,
    pub app_package: String,
    pub app_activity: String,
    pub no_reset: bool,
    pub auto_grant_permissions: bool,
    pub new_command_timeout: u64,
    pub app_wait_duration: u64,
    pub auto_accept_alerts: bool,
    pub dont_stop_app_on_reset: bool,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            platform_version: "11.0".to_string(),
            device_name: "emulator-5554".to_string(),
            automation_name: "UiAutomator2".to_string(),
            app_package: "com.planity.android".to_string(),
            app_activity: "com.planity.splash.SplashActivity".to_string(),
            no_reset: true,
            auto_grant_permissions: true,
            new_command_timeout: 3600,
            app_wait_duration: 20_000,
            auto_accept_alerts: true,
            dont_stop_app_on_reset: true,
        }
    }
}

/// Appium capabilities for the iOS app
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IosConfig {
    pub platform_version: String,
    pub device_name: String,
    pub automation_name: String,
    pub udid: Option<String>,
    pub bundle_id: Option<String>,
    pub no_reset: bool,
    pub auto_grant_permissions: bool,
    pub new_command_timeout: u64,
    pub app_wait_duration: u64,
    pub auto_accept_alerts: bool,
}

impl Default for IosConfig {
    fn default() -> Self {
        Self {
            platform_version: "16.0".to_string(),
            device_name: "iPhone 14".to_string(),
            automation_name: "XCUITest".to_string(),
            udid: None,
            bundle_id: None,
            no_reset: true,
            auto_grant_permissions: true,
            new_command_timeout: 3600,
            app_wait_duration: 20_000,
            auto_accept_alerts: true,
        }
    }
}
