use std::sync::Arc;
use std::time::Duration;

use super::RequestContext;
use crate::{AuthError, TokenCodec, UserRepository};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves a session token to a principal.
///
/// Fails closed: a request never proceeds with a partially resolved or null
/// identity. Token problems of any kind surface as `Unauthenticated`; store
/// failures and slow lookups surface as `ServiceUnavailable`.
pub struct SessionVerifier<U: UserRepository> {
    users: Arc<U>,
    codec: TokenCodec,
    lookup_timeout: Duration,
}

impl<U: UserRepository> Clone for SessionVerifier<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            codec: self.codec.clone(),
            lookup_timeout: self.lookup_timeout,
        }
    }
}

impl<U: UserRepository> SessionVerifier<U> {
    pub fn new(users: Arc<U>, codec: TokenCodec) -> Self {
        Self {
            users,
            codec,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_verifier", skip_all, err)
    )]
    pub async fn authenticate(&self, token: Option<&str>) -> Result<RequestContext, AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Err(AuthError::Unauthenticated);
        };

        let user_id = self.codec.verify(token).map_err(|e| {
            log::debug!(target: "portfolio_auth", "msg=\"session token rejected\" reason=\"{e}\"");
            AuthError::Unauthenticated
        })?;

        let lookup = tokio::time::timeout(self.lookup_timeout, self.users.find_user_by_id(user_id));
        let found = match lookup.await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                log::error!(target: "portfolio_auth", "msg=\"principal lookup failed\" user_id={user_id} error=\"{e}\"");
                return Err(AuthError::ServiceUnavailable("credential store unavailable".to_owned()));
            }
            Err(_) => {
                log::error!(
                    target: "portfolio_auth",
                    "msg=\"principal lookup timed out\" user_id={user_id} timeout_ms={}",
                    self.lookup_timeout.as_millis()
                );
                return Err(AuthError::ServiceUnavailable("credential store timed out".to_owned()));
            }
        };

        match found {
            Some(user) => Ok(RequestContext::authenticated(user)),
            None => {
                log::warn!(target: "portfolio_auth", "msg=\"token subject no longer exists\" user_id={user_id}");
                Err(AuthError::Unauthenticated)
            }
        }
    }
}
