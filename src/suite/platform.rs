//! Platform types
//!
//! This module contains the target platform enum, the browser backends for
//! web runs, and the selector that records which platform a scenario runs on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Platform Enum
// ============================================================================

/// Target platform for a test run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Browser automation through a WebDriver server (default)
    #[default]
    Web,
    /// Android app automation through Appium (UiAutomator2)
    Android,
    /// iOS app automation through Appium (XCUITest)
    #[serde(rename = "iOS")]
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Web, Platform::Android, Platform::Ios];

    /// Name as written in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "Web",
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnsupportedPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnsupportedPlatform(s.to_string()))
    }
}

/// Raised when no recognized platform is selected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported platform: {0:?}")]
pub struct UnsupportedPlatform(pub String);

// ============================================================================
// Browser backends
// ============================================================================

/// Browser driven on the web platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
    Edge,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
        }
    }

    /// W3C `browserName` capability
    pub fn browser_name(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "MicrosoftEdge",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "edge" => Ok(Browser::Edge),
            other => Err(format!("Unsupported browser: {}", other)),
        }
    }
}

// ============================================================================
// Platform Selector
// ============================================================================

/// Records the platform a scenario targets.
///
/// Only scenario setup calls [`PlatformSelector::set`]; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct PlatformSelector {
    current: Option<Platform>,
}

impl PlatformSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(platform: Platform) -> Self {
        Self {
            current: Some(platform),
        }
    }

    pub fn set(&mut self, platform: Platform) {
        self.current = Some(platform);
    }

    /// Active platform, or `UnsupportedPlatform` if none was selected
    pub fn current(&self) -> Result<Platform, UnsupportedPlatform> {
        self.current
            .ok_or_else(|| UnsupportedPlatform("<unset>".to_string()))
    }

    pub fn is_web(&self) -> bool {
        self.current == Some(Platform::Web)
    }

    pub fn is_android(&self) -> bool {
        self.current == Some(Platform::Android)
    }

    pub fn is_ios(&self) -> bool {
        self.current == Some(Platform::Ios)
    }
}
