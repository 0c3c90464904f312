//! Integration tests for configuration loading as the CLI drives it.

use eiam_config::{
    AuditUserType, AuthStrategy, ConfigLoader, ProfileConfig, ProfileStore, SecureValue,
};
use secrecy::{ExposeSecret, SecretString};

/// Builder values (CLI flags) win over everything else.
#[test]
fn test_config_loader_cli_overrides() {
    let config = ConfigLoader::new()
        .with_base_url("https://cli-override.example.com".to_string())
        .with_api_token("cli-token".to_string())
        .build()
        .expect("should build with CLI overrides");

    assert_eq!(
        config.connection.base_url,
        "https://cli-override.example.com"
    );
    assert!(matches!(
        config.auth.strategy,
        AuthStrategy::ApiToken { .. }
    ));
}

/// A profile written through `ProfileStore` is readable through `ConfigLoader`.
#[test]
fn test_profile_store_feeds_loader() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut store = ProfileStore::open(path.clone()).unwrap();
    store
        .save_profile(
            "corp",
            ProfileConfig {
                base_url: Some("https://iam.corp.example.com/".to_string()),
                username: Some("alice".to_string()),
                password: Some(SecureValue::Plain(SecretString::new(
                    "correct".to_string().into(),
                ))),
                audit_user_type: Some(AuditUserType::App),
                display_utc_offset: Some("+08:00".to_string()),
                ..ProfileConfig::default()
            },
        )
        .unwrap();

    let config = ConfigLoader::new()
        .with_profile_name("corp".to_string())
        .with_config_path(path)
        .from_profile()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.connection.base_url, "https://iam.corp.example.com");
    assert_eq!(config.connection.display_utc_offset_seconds, 28_800);
    assert_eq!(config.audit.user_type, AuditUserType::App);
    match config.auth.strategy {
        AuthStrategy::Password { username, password } => {
            assert_eq!(username, "alice");
            assert_eq!(password.expose_secret(), "correct");
        }
        other => panic!("Expected Password strategy, got {other:?}"),
    }
}
