use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DEFAULT_DELIVERABILITY_TIMEOUT, EmailVerifier};
use crate::SecretString;

pub const ZEROBOUNCE_VALIDATE_URL: &str = "https://api.zerobounce.net/v2/validate";

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            log::warn!(target: "portfolio_auth", "msg=\"http client build failed, using defaults\" error=\"{e}\"");
            reqwest::Client::new()
        })
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    status: String,
}

/// Deliverability check backed by the ZeroBounce validate endpoint.
///
/// Fails closed: transport errors, decoding errors and timeouts count as
/// undeliverable.
#[derive(Debug, Clone)]
pub struct ZeroBounceVerifier {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    timeout: Duration,
}

impl ZeroBounceVerifier {
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: build_client(DEFAULT_DELIVERABILITY_TIMEOUT),
            api_key: api_key.into(),
            endpoint: ZEROBOUNCE_VALIDATE_URL.to_owned(),
            timeout: DEFAULT_DELIVERABILITY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Upper bound on one validate call, connect through body.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self.timeout = timeout;
        self
    }

    /// Only `valid` is deliverable; `catch-all`, `unknown` and the rest are not.
    pub fn interpret(status: &str) -> bool {
        status.eq_ignore_ascii_case("valid")
    }

    async fn fetch_status(&self, email: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("api_key", self.api_key.expose_secret()),
                ("email", email),
                ("ip_address", ""),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<ValidateResponse>()
            .await?;
        Ok(response.status)
    }
}

#[async_trait]
impl EmailVerifier for ZeroBounceVerifier {
    async fn is_deliverable(&self, email: &str) -> bool {
        // the client timeout is lost if the builder fell back to defaults
        let Ok(checked) = tokio::time::timeout(self.timeout, self.fetch_status(email)).await else {
            log::warn!(
                target: "portfolio_auth",
                "msg=\"deliverability check timed out\" timeout_ms={}",
                self.timeout.as_millis()
            );
            return false;
        };

        match checked {
            Ok(status) => {
                log::debug!(target: "portfolio_auth", "msg=\"deliverability checked\" status=\"{status}\"");
                Self::interpret(&status)
            }
            Err(e) => {
                log::warn!(target: "portfolio_auth", "msg=\"deliverability check failed\" error=\"{e}\"");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_valid_is_deliverable() {
        assert!(ZeroBounceVerifier::interpret("valid"));
        assert!(!ZeroBounceVerifier::interpret("invalid"));
        assert!(!ZeroBounceVerifier::interpret("catch-all"));
        assert!(!ZeroBounceVerifier::interpret("unknown"));
        assert!(!ZeroBounceVerifier::interpret("do_not_mail"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_closed() {
        let verifier = ZeroBounceVerifier::new("key").with_endpoint("http://127.0.0.1:9/validate");
        assert!(!verifier.is_deliverable("owner@example.com").await);
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out_closed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // accept and hold connections without ever answering
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let verifier = ZeroBounceVerifier::new("key")
            .with_endpoint(format!("http://{addr}/validate"))
            .with_timeout(Duration::from_millis(200));

        let checked = tokio::time::timeout(
            Duration::from_secs(5),
            verifier.is_deliverable("owner@example.com"),
        )
        .await;
        assert_eq!(checked, Ok(false));

        server.abort();
    }

    #[test]
    fn test_debug_hides_key() {
        let verifier = ZeroBounceVerifier::new("super-secret-key");
        assert!(!format!("{verifier:?}").contains("super-secret-key"));
    }
}
