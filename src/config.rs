//! Runtime configuration.
//!
//! ```rust
//! use portfolio_auth::config::PortfolioConfig;
//!
//! let config = PortfolioConfig::from_lookup(|key| match key {
//!     "JWT_SECRET_KEY" => Some("a-signing-secret-of-at-least-32-bytes".to_owned()),
//!     "COOKIE_EXPIRES" => Some("3".to_owned()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.tokens.session_expiry, chrono::Duration::days(3));
//! ```

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use uuid::Uuid;

use crate::crypto::DEFAULT_TOKEN_LENGTH;
use crate::deliverability::{AcceptAllVerifier, DEFAULT_DELIVERABILITY_TIMEOUT, EmailVerifier};
use crate::session::{CookieConfig, DEFAULT_LOOKUP_TIMEOUT, SessionVerifier};
use crate::{AuthError, SecretString, SessionTokenConfig, TokenCodec, UserRepository};

#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub tokens: TokenConfig,
    pub cookie: CookieConfig,
    pub jwt_secret: SecretString,
    /// Base of the reset link mailed to users.
    pub dashboard_url: String,
    /// Account shown on the public portfolio page.
    pub portfolio_owner: Option<Uuid>,
    /// Without a key, registration skips the deliverability check.
    pub zerobounce_api_key: Option<SecretString>,
    /// Upper bound on the principal lookup made for every authenticated request.
    pub lookup_timeout: StdDuration,
    /// Upper bound on one ZeroBounce call. A timeout counts as undeliverable.
    pub deliverability_timeout: StdDuration,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Default: 7 days. Also the cookie lifetime.
    pub session_expiry: Duration,
    /// Default: 15 minutes.
    pub reset_expiry: Duration,
    /// Plaintext reset token length in characters.
    pub reset_token_length: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            session_expiry: Duration::days(7),
            reset_expiry: Duration::minutes(15),
            reset_token_length: DEFAULT_TOKEN_LENGTH,
        }
    }
}

impl Default for PortfolioConfig {
    /// Defaults with no signing secret; [`token_codec`](Self::token_codec)
    /// fails until one is set.
    fn default() -> Self {
        Self {
            tokens: TokenConfig::default(),
            cookie: CookieConfig::default(),
            jwt_secret: SecretString::default(),
            dashboard_url: "http://localhost:5173".to_owned(),
            portfolio_owner: None,
            zerobounce_api_key: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            deliverability_timeout: DEFAULT_DELIVERABILITY_TIMEOUT,
        }
    }
}

impl PortfolioConfig {
    /// Local setup with a fixed, public signing secret. Never deploy it.
    pub fn development() -> Self {
        Self {
            jwt_secret: SecretString::new("development-only-secret-0123456789abcdef"),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, one variable at a time.
    ///
    /// | Variable | Meaning |
    /// |----------|---------|
    /// | `JWT_SECRET_KEY` | signing secret, required, at least 32 bytes |
    /// | `COOKIE_EXPIRES` | session lifetime in days |
    /// | `RESET_TOKEN_EXPIRE_MINUTES` | reset link lifetime |
    /// | `DASHBOARD_URL` | reset link base |
    /// | `PORTFOLIO_OWNER_ID` | UUID of the public profile |
    /// | `ZEROBOUNCE_API_KEY` | enables the deliverability check |
    /// | `COOKIE_SECURE` | `true` / `false` |
    /// | `ZEROBOUNCE_TIMEOUT_MS` | deliverability check bound in milliseconds |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let secret = lookup("JWT_SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::ConfigurationError("JWT_SECRET_KEY is not set".to_owned()))?;
        config.jwt_secret = SecretString::new(secret);
        SessionTokenConfig::new(config.jwt_secret.clone())?;

        if let Some(days) = lookup("COOKIE_EXPIRES") {
            config.tokens.session_expiry = Duration::days(positive("COOKIE_EXPIRES", &days)?);
        }
        if let Some(minutes) = lookup("RESET_TOKEN_EXPIRE_MINUTES") {
            config.tokens.reset_expiry =
                Duration::minutes(positive("RESET_TOKEN_EXPIRE_MINUTES", &minutes)?);
        }
        if let Some(url) = lookup("DASHBOARD_URL") {
            config.dashboard_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(id) = lookup("PORTFOLIO_OWNER_ID") {
            let id = Uuid::parse_str(id.trim()).map_err(|e| {
                AuthError::ConfigurationError(format!("PORTFOLIO_OWNER_ID is not a UUID: {e}"))
            })?;
            config.portfolio_owner = Some(id);
        }
        config.zerobounce_api_key = lookup("ZEROBOUNCE_API_KEY")
            .filter(|k| !k.is_empty())
            .map(SecretString::new);
        if let Some(flag) = lookup("COOKIE_SECURE") {
            config.cookie.secure = boolean("COOKIE_SECURE", &flag)?;
        }
        if let Some(ms) = lookup("ZEROBOUNCE_TIMEOUT_MS") {
            let ms = positive("ZEROBOUNCE_TIMEOUT_MS", &ms)?;
            config.deliverability_timeout = StdDuration::from_millis(ms.unsigned_abs());
        }

        log::debug!(
            target: "portfolio_auth",
            "msg=\"config loaded\" session_days={} reset_minutes={} cookie_secure={} owner_set={}",
            config.tokens.session_expiry.num_days(),
            config.tokens.reset_expiry.num_minutes(),
            config.cookie.secure,
            config.portfolio_owner.is_some()
        );

        Ok(config)
    }

    pub fn token_codec(&self) -> Result<TokenCodec, AuthError> {
        let config = SessionTokenConfig::new(self.jwt_secret.clone())?
            .with_expiry(self.tokens.session_expiry);
        Ok(TokenCodec::new(config))
    }

    pub fn session_verifier<U: UserRepository>(
        &self,
        users: Arc<U>,
    ) -> Result<SessionVerifier<U>, AuthError> {
        Ok(SessionVerifier::new(users, self.token_codec()?).with_lookup_timeout(self.lookup_timeout))
    }

    /// ZeroBounce when an API key is configured, otherwise accept every address.
    pub fn email_verifier(&self) -> Arc<dyn EmailVerifier> {
        match self.zerobounce_api_key {
            #[cfg(feature = "zerobounce")]
            Some(ref key) => Arc::new(
                crate::deliverability::ZeroBounceVerifier::new(key.clone())
                    .with_timeout(self.deliverability_timeout),
            ),
            #[cfg(not(feature = "zerobounce"))]
            Some(_) => {
                log::warn!(
                    target: "portfolio_auth",
                    "msg=\"ZEROBOUNCE_API_KEY set but the zerobounce feature is disabled\""
                );
                Arc::new(AcceptAllVerifier)
            }
            None => Arc::new(AcceptAllVerifier),
        }
    }
}

fn positive(key: &str, raw: &str) -> Result<i64, AuthError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AuthError::ConfigurationError(format!(
            "{key} must be a positive integer, got {raw:?}"
        ))),
    }
}

fn boolean(key: &str, raw: &str) -> Result<bool, AuthError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AuthError::ConfigurationError(format!(
            "{key} must be true or false, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "test-secret-32-bytes-long-key-01";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PortfolioConfig::default();
        assert_eq!(config.tokens.session_expiry, Duration::days(7));
        assert_eq!(config.tokens.reset_expiry, Duration::minutes(15));
        assert_eq!(config.tokens.reset_token_length, 32);
        assert_eq!(config.lookup_timeout, StdDuration::from_secs(5));
        assert_eq!(config.deliverability_timeout, StdDuration::from_secs(5));
        assert!(config.token_codec().is_err());
    }

    #[test]
    fn test_development_builds_codec() {
        assert!(PortfolioConfig::development().token_codec().is_ok());
    }

    #[test]
    fn test_full_lookup() {
        let owner = Uuid::new_v4().to_string();
        let config = PortfolioConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", SECRET),
            ("COOKIE_EXPIRES", "3"),
            ("RESET_TOKEN_EXPIRE_MINUTES", "30"),
            ("DASHBOARD_URL", "https://dash.example.com/"),
            ("PORTFOLIO_OWNER_ID", owner.as_str()),
            ("ZEROBOUNCE_API_KEY", "zb-key"),
            ("COOKIE_SECURE", "true"),
            ("ZEROBOUNCE_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.tokens.session_expiry, Duration::days(3));
        assert_eq!(config.tokens.reset_expiry, Duration::minutes(30));
        assert_eq!(config.dashboard_url, "https://dash.example.com");
        assert_eq!(config.portfolio_owner.map(|id| id.to_string()), Some(owner));
        assert!(config.zerobounce_api_key.is_some());
        assert!(config.cookie.secure);
        assert_eq!(config.deliverability_timeout, StdDuration::from_millis(1500));
        assert_eq!(config.token_codec().unwrap().expiry(), Duration::days(3));
    }

    #[tokio::test]
    async fn test_email_verifier_without_key_accepts() {
        let verifier = PortfolioConfig::development().email_verifier();
        assert!(verifier.is_deliverable("anyone@example.com").await);
    }

    #[test]
    fn test_missing_secret() {
        let result = PortfolioConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }

    #[test]
    fn test_short_secret() {
        let result = PortfolioConfig::from_lookup(lookup(&[("JWT_SECRET_KEY", "short")]));
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }

    #[test]
    fn test_bad_values() {
        for (key, value) in [
            ("COOKIE_EXPIRES", "0"),
            ("COOKIE_EXPIRES", "seven"),
            ("RESET_TOKEN_EXPIRE_MINUTES", "-5"),
            ("PORTFOLIO_OWNER_ID", "67cda4986b859466f3f1ec68"),
            ("COOKIE_SECURE", "maybe"),
            ("ZEROBOUNCE_TIMEOUT_MS", "0"),
        ] {
            let result =
                PortfolioConfig::from_lookup(lookup(&[("JWT_SECRET_KEY", SECRET), (key, value)]));
            assert!(
                matches!(result, Err(AuthError::ConfigurationError(_))),
                "{key}={value} was accepted"
            );
        }
    }
}
