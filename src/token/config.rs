use std::fmt;

use chrono::Duration;

use crate::{AuthError, SecretString};

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Signing key and lifetime policy for session tokens.
#[derive(Clone)]
pub struct SessionTokenConfig {
    pub(crate) secret: SecretString,
    /// Default: 7 days.
    pub(crate) expiry: Duration,
    pub(crate) issuer: Option<String>,
}

impl fmt::Debug for SessionTokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenConfig")
            .field("secret", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl SessionTokenConfig {
    /// # Errors
    ///
    /// Returns `AuthError::ConfigurationError` if the secret is shorter than
    /// [`MIN_SECRET_LENGTH`] bytes.
    pub fn new(secret: impl Into<SecretString>) -> Result<Self, AuthError> {
        let secret = secret.into();

        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::ConfigurationError(format!(
                "JWT secret must be at least {MIN_SECRET_LENGTH} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            secret,
            expiry: Duration::days(7),
            issuer: None,
        })
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }
}
