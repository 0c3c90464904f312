//! Credentials as configured: the auth strategy a [`crate::Config`] carries
//! and the [`SecureValue`] form secrets take in the profile file.
//!
//! Secrets are `SecretString` at runtime but serialize in clear, so a profile
//! written to disk round-trips. Keyring entries are only read here; the
//! profile store writes them.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(|s| SecretString::new(s.into()))
}

/// Strategy for authenticating with the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStrategy {
    /// Username and password; the client runs the encrypted login flow.
    #[serde(rename = "password")]
    Password {
        username: String,
        #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
        password: SecretString,
    },
    /// Pre-issued access token sent as a bearer header.
    #[serde(rename = "token")]
    ApiToken {
        #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
        token: SecretString,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(flatten)]
    pub strategy: AuthStrategy,
}

/// Keyring service every stored secret is filed under.
pub const KEYRING_SERVICE: &str = "eiam-cli";

/// A profile secret: inline, or a pointer to a keyring entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecureValue {
    Keyring { keyring_account: String },
    Plain(
        #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
        SecretString,
    ),
}

impl SecureValue {
    /// The secret itself, read from the keyring when stored there.
    pub fn resolve(&self) -> Result<SecretString, keyring::Error> {
        match self {
            Self::Plain(secret) => Ok(secret.clone()),
            Self::Keyring { keyring_account } => keyring::Entry::new(KEYRING_SERVICE, keyring_account)?
                .get_password()
                .map(|value| SecretString::new(value.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_strategy_tagged_serialization() {
        let strategy = AuthStrategy::Password {
            username: "alice".to_string(),
            password: SecretString::new("correct".to_string().into()),
        };

        let json = serde_json::to_value(&strategy).unwrap();
        assert_eq!(json["type"], "password");
        assert_eq!(json["username"], "alice");

        let token: AuthStrategy =
            serde_json::from_str(r#"{"type":"token","token":"tok-1"}"#).unwrap();
        match token {
            AuthStrategy::ApiToken { token } => assert_eq!(token.expose_secret(), "tok-1"),
            other => panic!("Expected ApiToken, got {other:?}"),
        }
    }

    #[test]
    fn test_secure_value_resolve_plain() {
        let val = SecureValue::Plain(SecretString::new("test-secret".to_string().into()));
        assert_eq!(val.resolve().unwrap().expose_secret(), "test-secret");
    }

    #[test]
    fn test_secure_value_untagged_forms() {
        let plain: SecureValue = serde_json::from_str(r#""hunter2""#).unwrap();
        assert!(matches!(plain, SecureValue::Plain(_)));

        let keyring: SecureValue =
            serde_json::from_str(r#"{"keyring_account":"eiam-admin"}"#).unwrap();
        assert!(matches!(keyring, SecureValue::Keyring { .. }));
    }

    #[test]
    fn test_auth_config_debug_does_not_expose_password() {
        let auth_config = AuthConfig {
            strategy: AuthStrategy::Password {
                username: "alice".to_string(),
                password: SecretString::new("session-password-456".to_string().into()),
            },
        };

        let debug_output = format!("{:?}", auth_config);

        assert!(!debug_output.contains("session-password-456"));
        assert!(debug_output.contains("alice"));
    }

    #[test]
    fn test_secure_value_plain_not_exposed_in_debug() {
        let secure_value =
            SecureValue::Plain(SecretString::new("secure-value-secret".to_string().into()));
        assert!(!format!("{:?}", secure_value).contains("secure-value-secret"));
    }
}
