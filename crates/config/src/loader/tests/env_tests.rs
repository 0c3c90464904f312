//! Environment variable tests for the configuration loader builder.

use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::{AuditUserType, AuthStrategy};
use serial_test::serial;
use std::time::Duration;
use tempfile::TempDir;

use super::env_lock;
use super::profile_tests::create_test_config_file;

#[test]
#[serial]
fn test_env_overrides_profile() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config_file(temp_dir.path());

    temp_env::with_vars(
        [
            ("EIAM_BASE_URL", Some("https://override.eiam.example.com")),
            ("EIAM_AUDIT_PAGE_SIZE", Some("100")),
        ],
        || {
            let config = ConfigLoader::new()
                .with_profile_name("dev".to_string())
                .with_config_path(config_path.clone())
                .from_profile()
                .unwrap()
                .from_env()
                .unwrap()
                .build()
                .unwrap();

            assert_eq!(
                config.connection.base_url,
                "https://override.eiam.example.com"
            );
            assert_eq!(config.audit.page_size, 100);
            // Untouched profile values survive
            assert_eq!(config.audit.user_type, AuditUserType::App);
        },
    );
}

#[test]
#[serial]
fn test_full_env_configuration() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("EIAM_BASE_URL", Some("http://localhost:1989")),
            ("EIAM_USERNAME", Some("alice")),
            ("EIAM_PASSWORD", Some("correct")),
            ("EIAM_SKIP_VERIFY", Some("true")),
            ("EIAM_TIMEOUT", Some("15")),
            ("EIAM_SESSION_TTL", Some("600")),
            ("EIAM_SESSION_EXPIRY_BUFFER", Some("30")),
            ("EIAM_USER_TYPE", Some("app")),
            ("EIAM_DISPLAY_UTC_OFFSET", Some("+08:00")),
            ("EIAM_API_TOKEN", None),
            ("EIAM_PROFILE", None),
            ("EIAM_CONFIG_PATH", None),
        ],
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();

            assert_eq!(config.connection.base_url, "http://localhost:1989");
            assert!(config.connection.skip_verify);
            assert_eq!(config.connection.timeout, Duration::from_secs(15));
            assert_eq!(config.connection.session_ttl_seconds, 600);
            assert_eq!(config.connection.session_expiry_buffer_seconds, 30);
            assert_eq!(config.connection.display_utc_offset_seconds, 8 * 3600);
            assert_eq!(config.audit.user_type, AuditUserType::App);
            assert!(matches!(
                config.auth.strategy,
                AuthStrategy::Password { ref username, .. } if username == "alice"
            ));
        },
    );
}

#[test]
#[serial]
fn test_empty_env_vars_ignored() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("EIAM_API_TOKEN", Some("")),
            ("EIAM_USERNAME", Some("  ")),
            ("EIAM_PASSWORD", Some("")),
            ("EIAM_PROFILE", None),
            ("EIAM_CONFIG_PATH", None),
        ],
        || {
            let config = ConfigLoader::new()
                .with_base_url("https://eiam.example.com".to_string())
                .with_username("alice".to_string())
                .with_password("correct".to_string())
                .from_env()
                .unwrap()
                .build()
                .unwrap();

            assert!(matches!(
                config.auth.strategy,
                AuthStrategy::Password { .. }
            ));
        },
    );
}

#[test]
#[serial]
fn test_api_token_takes_precedence_over_password() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("EIAM_BASE_URL", Some("https://eiam.example.com")),
            ("EIAM_USERNAME", Some("alice")),
            ("EIAM_PASSWORD", Some("correct")),
            ("EIAM_API_TOKEN", Some("tok-abc")),
            ("EIAM_PROFILE", None),
            ("EIAM_CONFIG_PATH", None),
        ],
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
            assert!(matches!(config.auth.strategy, AuthStrategy::ApiToken { .. }));
        },
    );
}

#[test]
#[serial]
fn test_invalid_env_values_name_the_variable() {
    let _lock = env_lock().lock().unwrap();

    let cases = [
        ("EIAM_SKIP_VERIFY", "maybe"),
        ("EIAM_TIMEOUT", "soon"),
        ("EIAM_AUDIT_PAGE_SIZE", "-1"),
        ("EIAM_USER_TYPE", "robot"),
    ];

    for (var, value) in cases {
        temp_env::with_vars([(var, Some(value))], || {
            match ConfigLoader::new().from_env() {
                Err(ConfigError::InvalidValue { var: reported, .. }) => assert_eq!(reported, var),
                Err(other) => panic!("{var}: expected InvalidValue, got {other}"),
                Ok(_) => panic!("{var}: expected InvalidValue, got Ok"),
            }
        });
    }
}

#[test]
#[serial]
fn test_profile_name_from_env() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config_file(temp_dir.path());

    temp_env::with_vars(
        [
            ("EIAM_PROFILE", Some("prod")),
            ("EIAM_CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ("EIAM_BASE_URL", None),
            ("EIAM_API_TOKEN", None),
            ("EIAM_USERNAME", None),
            ("EIAM_PASSWORD", None),
        ],
        || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .from_profile()
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(config.connection.base_url, "https://eiam.example.com");
        },
    );
}

#[test]
#[serial]
fn test_env_wins_when_profile_is_applied_last() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config_file(temp_dir.path());

    temp_env::with_vars(
        [
            ("EIAM_BASE_URL", Some("https://env.eiam.example.com")),
            ("EIAM_PROFILE", Some("dev")),
            ("EIAM_CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ("EIAM_AUDIT_PAGE_SIZE", None),
            ("EIAM_API_TOKEN", None),
            ("EIAM_USERNAME", None),
            ("EIAM_PASSWORD", None),
        ],
        || {
            let loader = ConfigLoader::new().from_env().unwrap();
            assert_eq!(loader.profile_name().map(String::as_str), Some("dev"));

            let config = loader.from_profile().unwrap().build().unwrap();
            assert_eq!(config.connection.base_url, "https://env.eiam.example.com");
            // Gaps are still filled from the profile
            assert_eq!(config.audit.page_size, 25);
        },
    );
}
