//! Session capabilities per platform
//!
//! Builds the `alwaysMatch` capability object sent when a session is created.

use serde_json::{json, Map, Value};

use crate::suite::{AndroidConfig, Browser, IosConfig, Platform, SuiteConfig};

use super::DriverError;

pub fn for_platform(platform: Platform, config: &SuiteConfig) -> Result<Value, DriverError> {
    match platform {
        Platform::Web => {
            let browser = config.browser().map_err(|reason| DriverError::SessionInit {
                platform,
                reason,
            })?;
            Ok(web(browser, config))
        }
        Platform::Android => Ok(android(&config.android)),
        Platform::Ios => Ok(ios(&config.ios)),
    }
}

pub fn web(browser: Browser, config: &SuiteConfig) -> Value {
    let window = format!("--window-size={},{}", config.window_width, config.window_height);

    match browser {
        Browser::Chrome => {
            let mut args = vec!["--disable-search-engine-choice-screen".to_string()];
            if config.headless {
                args.push("--headless".to_string());
                args.push("--disable-gpu".to_string());
            }
            args.push(window);
            json!({
                "browserName": browser.browser_name(),
                "goog:chromeOptions": { "args": args }
            })
        }
        Browser::Firefox => {
            let mut args = vec![
                format!("--width={}", config.window_width),
                format!("--height={}", config.window_height),
            ];
            if config.headless {
                args.insert(0, "-headless".to_string());
            }
            json!({
                "browserName": browser.browser_name(),
                "moz:firefoxOptions": { "args": args }
            })
        }
        Browser::Edge => {
            let mut args = Vec::new();
            if config.headless {
                args.push("--headless".to_string());
            }
            args.push(window);
            json!({
                "browserName": browser.browser_name(),
                "ms:edgeOptions": { "args": args }
            })
        }
    }
}

pub fn android(config: &AndroidConfig) -> Value {
    json!({
        "platformName": "Android",
        "appium:platformVersion": config.platform_version,
        "appium:deviceName": config.device_name,
        "appium:automationName": config.automation_name,
        "appium:appPackage": config.app_package,
        "appium:appActivity": config.app_activity,
        "appium:noReset": config.no_reset,
        "appium:autoGrantPermissions": config.auto_grant_permissions,
        "appium:newCommandTimeout": config.new_command_timeout,
        "appium:appWaitDuration": config.app_wait_duration,
        "appium:autoAcceptAlerts": config.auto_accept_alerts,
        "appium:dontStopAppOnReset": config.dont_stop_app_on_reset,
    })
}

pub fn ios(config: &IosConfig) -> Value {
    let mut caps = Map::new();
    caps.insert("platformName".into(), json!("iOS"));
    caps.insert("appium:platformVersion".into(), json!(config.platform_version));
    caps.insert("appium:deviceName".into(), json!(config.device_name));
    caps.insert("appium:automationName".into(), json!(config.automation_name));
    if let Some(udid) = &config.udid {
        caps.insert("appium:udid".into(), json!(udid));
    }
    if let Some(bundle_id) = &config.bundle_id {
        caps.insert("appium:bundleId".into(), json!(bundle_id));
    }
    caps.insert("appium:noReset".into(), json!(config.no_reset));
    caps.insert(
        "appium:autoGrantPermissions".into(),
        json!(config.auto_grant_permissions),
    );
    caps.insert(
        "appium:newCommandTimeout".into(),
        json!(config.new_command_timeout),
    );
    caps.insert("appium:appWaitDuration".into(), json!(config.app_wait_duration));
    caps.insert("appium:autoAcceptAlerts".into(), json!(config.auto_accept_alerts));
    Value::Object(caps)
}
