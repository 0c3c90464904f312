//! Validation tests for the configuration loader builder.

use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use std::time::Duration;

fn token_loader(base_url: &str) -> ConfigLoader {
    ConfigLoader::new()
        .with_base_url(base_url.to_string())
        .with_api_token("tok".to_string())
}

#[test]
fn test_base_url_normalized() {
    let config = token_loader("  https://eiam.example.com/  ").build().unwrap();
    assert_eq!(config.connection.base_url, "https://eiam.example.com");
}

#[test]
fn test_base_url_rejections() {
    assert!(matches!(
        token_loader("   ").build(),
        Err(ConfigError::MissingBaseUrl)
    ));
    assert!(matches!(
        token_loader("eiam.example.com").build(),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        token_loader("ftp://eiam.example.com").build(),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        ConfigLoader::new().with_api_token("tok".to_string()).build(),
        Err(ConfigError::MissingBaseUrl)
    ));
}

#[test]
fn test_missing_auth() {
    let result = ConfigLoader::new()
        .with_base_url("https://eiam.example.com".to_string())
        .with_username("alice".to_string())
        .build();
    assert!(matches!(result, Err(ConfigError::MissingAuth)));
}

#[test]
fn test_timeout_bounds() {
    assert!(matches!(
        token_loader("https://eiam.example.com")
            .with_timeout(Duration::from_secs(0))
            .build(),
        Err(ConfigError::InvalidTimeout { .. })
    ));
    assert!(matches!(
        token_loader("https://eiam.example.com")
            .with_timeout(Duration::from_secs(3601))
            .build(),
        Err(ConfigError::InvalidTimeout { .. })
    ));
    assert!(
        token_loader("https://eiam.example.com")
            .with_timeout(Duration::from_secs(3600))
            .build()
            .is_ok()
    );
}

#[test]
fn test_session_ttl_must_exceed_buffer() {
    let mut loader = token_loader("https://eiam.example.com");
    loader.settings.session_ttl_seconds = Some(60);
    loader.settings.session_expiry_buffer_seconds = Some(60);
    assert!(matches!(
        loader.build(),
        Err(ConfigError::InvalidSessionTtl { .. })
    ));

    let mut loader = token_loader("https://eiam.example.com");
    loader.settings.session_ttl_seconds = Some(86_401);
    assert!(matches!(
        loader.build(),
        Err(ConfigError::InvalidSessionTtl { .. })
    ));
}

#[test]
fn test_audit_page_size_bounds() {
    for bad in [0, 1001] {
        assert!(matches!(
            token_loader("https://eiam.example.com")
                .with_audit_page_size(bad)
                .build(),
            Err(ConfigError::InvalidPageSize { .. })
        ));
    }
    let config = token_loader("https://eiam.example.com")
        .with_audit_page_size(1000)
        .build()
        .unwrap();
    assert_eq!(config.audit.page_size, 1000);
}
