mod common;

use common::*;
use planity_e2e::suite::{ConfigError, ConfigLoader, Platform, DEFAULT_CONFIG_PATHS};
use planity_e2e::WaitProfile;
use std::time::Duration;

#[test]
fn test_load_properties_file() {
    let dir = create_test_dir();
    let path = write_config(dir.path(), "configuration.properties", &web_properties("edge"));

    let config = ConfigLoader::load_file(&path).unwrap();

    assert_eq!(config.platform().unwrap(), Platform::Web);
    assert_eq!(config.browser().unwrap().to_string(), "edge");
    assert_eq!(config.server_url(Platform::Web), "http://localhost:4444");
}

#[test]
fn test_load_yaml_file() {
    let dir = create_test_dir();
    let path = write_config(dir.path(), "planity.yaml", &android_yaml());

    let config = ConfigLoader::load_file(&path).unwrap();

    assert_eq!(config.platform().unwrap(), Platform::Android);
    assert_eq!(config.android.device_name, "Pixel_7");
    assert_eq!(config.android.platform_version, "14");
    assert_eq!(config.server_url(Platform::Android), "http://10.0.0.2:4723");
    assert_eq!(
        config.wait_policy().timeout(WaitProfile::Default),
        Duration::from_millis(2000)
    );
}

#[test]
fn test_invalid_yaml_names_the_file() {
    let dir = create_test_dir();
    let path = write_config(dir.path(), "planity.yaml", "platformName: [Web\n");

    let err = ConfigLoader::load_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Yaml { .. }));
    assert!(err.to_string().contains("planity.yaml"));
}

#[test]
fn test_missing_file() {
    let dir = create_test_dir();
    let err = ConfigLoader::load_file(&dir.path().join("absent.properties")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_find_default_prefers_properties() {
    let dir = create_test_dir();
    write_config(dir.path(), "planity.yaml", &android_yaml());
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    write_config(
        &dir.path().join("config"),
        "configuration.properties",
        &web_properties("chrome"),
    );

    let found = ConfigLoader::find_default(dir.path()).unwrap();
    assert!(found.ends_with(DEFAULT_CONFIG_PATHS[0]));
}

#[test]
fn test_find_default_none() {
    let dir = create_test_dir();
    assert!(ConfigLoader::find_default(dir.path()).is_none());
}
