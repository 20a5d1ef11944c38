//! Configuration loader
//!
//! Loads a [`SuiteConfig`] from a YAML file or a Java-style `.properties`
//! file (`key=value`, `#` and `!` comments, dotted keys for mobile settings).

use std::path::{Path, PathBuf};

use super::config::SuiteConfig;

/// Files tried, in order, when no explicit path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/configuration.properties",
    "planity.yaml",
    "planity.yml",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Invalid value for {key} in {file}: {value:?}")]
    InvalidValue {
        file: String,
        key: String,
        value: String,
    },

    #[error("Unknown configuration key {key} in {file}")]
    UnknownKey { file: String, key: String },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the first default file that exists, or the built-in defaults
    pub fn load_default() -> Result<SuiteConfig, ConfigError> {
        match Self::find_default(Path::new(".")) {
            Some(path) => Self::load_file(&path),
            None => Ok(SuiteConfig::default()),
        }
    }

    pub fn find_default(root: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(|p| root.join(p))
            .find(|p| p.is_file())
    }

    pub fn load_file(path: &Path) -> Result<SuiteConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file = path.display().to_string();

        match path.extension().and_then(|e| e.to_str()) {
            Some("properties") => Self::parse_properties(&content, &file),
            _ => serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml { file, error: e }),
        }
    }

    pub fn parse_properties(content: &str, file: &str) -> Result<SuiteConfig, ConfigError> {
        let mut config = SuiteConfig::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some((key, value)) = line.split_once(['=', ':']) else {
                continue;
            };
            apply_property(&mut config, key.trim(), value.trim(), file)?;
        }

        Ok(config)
    }
}

fn apply_property(
    config: &mut SuiteConfig,
    key: &str,
    value: &str,
    file: &str,
) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        file: file.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    };
    let flag = || parse_bool(value).ok_or_else(invalid);
    let number = || value.parse::<u64>().map_err(|_| invalid());

    match key {
        "platformName" => config.platform_name = value.to_string(),
        "browser" => config.browser = value.to_string(),
        "baseUrl" => config.base_url = value.to_string(),
        "webdriverUrl" => config.webdriver_url = value.to_string(),
        "appiumUrl" => config.appium_url = value.to_string(),
        "headless" => config.headless = flag()?,
        "windowWidth" => config.window_width = number()? as u32,
        "windowHeight" => config.window_height = number()? as u32,
        "commandTimeoutMs" => config.command_timeout_ms = number()?,
        "reportDir" => config.report_dir = PathBuf::from(value),

        "waits.shortMs" => config.waits.short_ms = number()?,
        "waits.defaultMs" => config.waits.default_ms = number()?,
        "waits.longMs" => config.waits.long_ms = number()?,
        "waits.pollMs" => config.waits.poll_ms = number()?,
        "waits.consentMs" => config.waits.consent_ms = number()?,

        "android.platformVersion" => config.android.platform_version = value.to_string(),
        "android.deviceName" => config.android.device_name = value.to_string(),
        "android.automationName" => config.android.automation_name = value.to_string(),
        "android.appPackage" => config.android.app_package = value.to_string(),
        "android.appActivity" => config.android.app_activity = value.to_string(),
        "android.noReset" => config.android.no_reset = flag()?,
        "android.autoGrantPermissions" => config.android.auto_grant_permissions = flag()?,
        "android.newCommandTimeout" => config.android.new_command_timeout = number()?,
        "android.appWaitDuration" => config.android.app_wait_duration = number()?,
        "android.autoAcceptAlerts" => config.android.auto_accept_alerts = flag()?,
        "android.dontStopAppOnReset" => config.android.dont_stop_app_on_reset = flag()?,

        "ios.platformVersion" => config.ios.platform_version = value.to_string(),
        "ios.deviceName" => config.ios.device_name = value.to_string(),
        "ios.automationName" => config.ios.automation_name = value.to_string(),
        "ios.udid" => config.ios.udid = Some(value.to_string()),
        "ios.bundleId" => config.ios.bundle_id = Some(value.to_string()),
        "ios.noReset" => config.ios.no_reset = flag()?,
        "ios.autoGrantPermissions" => config.ios.auto_grant_permissions = flag()?,
        "ios.newCommandTimeout" => config.ios.new_command_timeout = number()?,
        "ios.appWaitDuration" => config.ios.app_wait_duration = number()?,
        "ios.autoAcceptAlerts" => config.ios.auto_accept_alerts = flag()?,

        _ => {
            return Err(ConfigError::UnknownKey {
                file: file.to_string(),
                key: key.to_string(),
            })
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
