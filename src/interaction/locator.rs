//! Element locators
//!
//! A [`Locator`] names one W3C/Appium location strategy and its value.
//! A [`PlatformLocator`] bundles the locators of one logical element across
//! platforms; page objects pick the one for the running platform.

use std::fmt;

use crate::suite::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
    /// UiAutomator selector expression (Android)
    AndroidUiAutomator(String),
    /// Accessibility identifier (content-desc on Android, name on iOS)
    AccessibilityId(String),
    /// NSPredicate string (iOS)
    IosPredicate(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    pub fn ui_automator(expression: impl Into<String>) -> Self {
        Locator::AndroidUiAutomator(expression.into())
    }

    /// UiAutomator selector matching an element by its exact text
    pub fn android_text(text: &str) -> Self {
        Locator::AndroidUiAutomator(format!("new UiSelector().text({})", quote(text)))
    }

    /// UiAutomator selector matching elements whose text contains `text`
    pub fn android_text_contains(text: &str) -> Self {
        Locator::AndroidUiAutomator(format!("new UiSelector().textContains({})", quote(text)))
    }

    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Locator::AccessibilityId(id.into())
    }

    pub fn ios_predicate(predicate: impl Into<String>) -> Self {
        Locator::IosPredicate(predicate.into())
    }

    /// The `using` field of a find-elements command
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css selector",
            Locator::XPath(_) => "xpath",
            Locator::AndroidUiAutomator(_) => "-android uiautomator",
            Locator::AccessibilityId(_) => "accessibility id",
            Locator::IosPredicate(_) => "-ios predicate string",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Css(v)
            | Locator::XPath(v)
            | Locator::AndroidUiAutomator(v)
            | Locator::AccessibilityId(v)
            | Locator::IosPredicate(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// The locators of one logical element, per platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformLocator {
    web: Option<Locator>,
    android: Option<Locator>,
    ios: Option<Locator>,
}

impl PlatformLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn web(mut self, locator: Locator) -> Self {
        self.web = Some(locator);
        self
    }

    pub fn android(mut self, locator: Locator) -> Self {
        self.android = Some(locator);
        self
    }

    pub fn ios(mut self, locator: Locator) -> Self {
        self.ios = Some(locator);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<&Locator> {
        match platform {
            Platform::Web => self.web.as_ref(),
            Platform::Android => self.android.as_ref(),
            Platform::Ios => self.ios.as_ref(),
        }
    }
}
