//! Email deliverability check run before registration.

#[cfg(feature = "zerobounce")]
mod zerobounce;

use std::time::Duration;

use async_trait::async_trait;

#[cfg(feature = "zerobounce")]
pub use zerobounce::{ZEROBOUNCE_VALIDATE_URL, ZeroBounceVerifier};

/// Default bound on one remote deliverability check.
pub const DEFAULT_DELIVERABILITY_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait EmailVerifier: Send + Sync {
    /// `false` for undeliverable addresses and for checks that could not run.
    async fn is_deliverable(&self, email: &str) -> bool;
}

/// Accepts every address. For development setups without an API key.
#[derive(Debug, Clone, Default)]
pub struct AcceptAllVerifier;

#[async_trait]
impl EmailVerifier for AcceptAllVerifier {
    async fn is_deliverable(&self, _email: &str) -> bool {
        true
    }
}

/// Rejects a fixed list of addresses, case-insensitively.
#[cfg(any(test, feature = "mocks"))]
#[derive(Debug, Clone, Default)]
pub struct MockEmailVerifier {
    rejected: Vec<String>,
}

#[cfg(any(test, feature = "mocks"))]
impl MockEmailVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rejected: emails.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
#[async_trait]
impl EmailVerifier for MockEmailVerifier {
    async fn is_deliverable(&self, email: &str) -> bool {
        !self.rejected.iter().any(|r| r.eq_ignore_ascii_case(email))
    }
}
