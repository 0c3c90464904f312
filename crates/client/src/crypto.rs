//! Login secret encryption.
//!
//! Responsibilities:
//! - Parse the login public key in the shapes the console serves.
//! - Encrypt the credential secret with RSA PKCS#1 v1.5 and base64-encode it.
//!
//! Does NOT handle:
//! - Fetching the key (see [`crate::endpoints::fetch_login_public_secret`]).
//!
//! Invariants:
//! - The plaintext secret is only exposed for the duration of [`seal`].
//! - Error messages never contain key material or the secret.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use secrecy::ExposeSecret;

use crate::error::{ClientError, Result};
use crate::models::{LoginCredential, PublicKeyInfo, SealedCredential};

/// Parse an RSA public key.
///
/// Accepts PEM SPKI (`BEGIN PUBLIC KEY`), PEM PKCS#1 (`BEGIN RSA PUBLIC KEY`),
/// or bare base64 DER in either encoding.
pub fn parse_public_key(raw: &str) -> Result<RsaPublicKey> {
    let raw = raw.trim();

    if raw.contains("BEGIN RSA PUBLIC KEY") {
        return RsaPublicKey::from_pkcs1_pem(raw)
            .map_err(|e| ClientError::Encryption(format!("invalid PKCS#1 public key: {e}")));
    }

    if raw.contains("BEGIN PUBLIC KEY") {
        return RsaPublicKey::from_public_key_pem(raw)
            .map_err(|e| ClientError::Encryption(format!("invalid SPKI public key: {e}")));
    }

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let der = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ClientError::Encryption(format!("public key is not base64: {e}")))?;

    RsaPublicKey::from_public_key_der(&der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
        .map_err(|e| ClientError::Encryption(format!("invalid DER public key: {e}")))
}

/// Encrypt `credential.secret` with `key`, producing the login form payload.
pub fn seal(credential: &LoginCredential, key: &PublicKeyInfo) -> Result<SealedCredential> {
    let public_key = parse_public_key(&key.public_key)?;

    let mut rng = rand::thread_rng();
    let ciphertext = public_key
        .encrypt(
            &mut rng,
            Pkcs1v15Encrypt,
            credential.secret.expose_secret().as_bytes(),
        )
        .map_err(|e| ClientError::Encryption(format!("RSA encryption failed: {e}")))?;

    Ok(SealedCredential::new(
        credential.identifier.clone(),
        STANDARD.encode(ciphertext),
        key.key_id.clone(),
    ))
}
