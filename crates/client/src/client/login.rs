//! Login flow methods for [`EiamClient`].
//!
//! The flow is three steps: fetch the public key, seal the credential with
//! it, submit the sealed form. Each step is exposed so callers can drive them
//! separately.

use crate::client::EiamClient;
use crate::crypto;
use crate::endpoints;
use crate::error::Result;
use crate::models::{LoginCredential, LoginOutcome, PublicKeyInfo, SealedCredential};

impl EiamClient {
    /// Fetch the RSA public key for the login form.
    pub async fn fetch_login_public_secret(&self) -> Result<PublicKeyInfo> {
        endpoints::fetch_login_public_secret(&self.http, &self.base_url, self.metrics.as_ref())
            .await
    }

    /// Submit an already sealed credential.
    ///
    /// An authenticated outcome replaces the stored session; a rejected one
    /// leaves it untouched.
    pub async fn submit_login(&mut self, credential: &SealedCredential) -> Result<LoginOutcome> {
        let outcome =
            endpoints::submit_login(&self.http, &self.base_url, credential, self.metrics.as_ref())
                .await?;

        if let LoginOutcome::Authenticated(token) = &outcome {
            self.session_manager.set_session_token(
                token.clone(),
                Some(self.session_ttl_seconds),
                Some(self.session_expiry_buffer_seconds),
            );
        }

        Ok(outcome)
    }

    /// Run the whole login flow for `credential`.
    ///
    /// # Errors
    ///
    /// Transport and decoding errors from either request, and
    /// [`crate::ClientError::Encryption`] when the key cannot be used.
    /// Bad credentials are not an error: they come back as
    /// [`LoginOutcome::Rejected`].
    pub async fn login(&mut self, credential: LoginCredential) -> Result<LoginOutcome> {
        let key = self.fetch_login_public_secret().await?;
        let sealed = crypto::seal(&credential, &key)?;
        self.submit_login(&sealed).await
    }
}
