#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).expect("Failed to write config file");
    path
}

pub fn web_properties(browser: &str) -> String {
    format!(
        r#"
# Planity web run
platformName=Web
browser={}
headless=true
webdriverUrl=http://localhost:4444
"#,
        browser
    )
}

pub fn android_yaml() -> String {
    r#"
platformName: Android
appiumUrl: http://10.0.0.2:4723
android:
  deviceName: Pixel_7
  platformVersion: "14"
waits:
  defaultMs: 2000
"#
    .to_string()
}

/// A Web config whose driver endpoint refuses connections
pub fn unreachable_properties(report_dir: &Path) -> String {
    format!(
        r#"
platformName=Web
webdriverUrl=http://127.0.0.1:9
reportDir={}
"#,
        report_dir.display()
    )
}
