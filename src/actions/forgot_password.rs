use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::PortfolioConfig;
use crate::crypto::{DEFAULT_TOKEN_LENGTH, generate_token, hash_token};
use crate::events::{AuthEvent, dispatch};
use crate::mail::{MailSender, password_reset_message, reset_link};
use crate::validators::require;
use crate::{AuthError, UserRepository};

#[derive(Debug, Clone)]
pub struct ForgotPasswordConfig {
    /// Default: 15 minutes.
    pub reset_expiry: Duration,
    /// Base of the mailed link, `<dashboard_url>/password/reset/<token>`.
    pub dashboard_url: String,
    pub token_length: usize,
}

impl Default for ForgotPasswordConfig {
    fn default() -> Self {
        Self {
            reset_expiry: Duration::minutes(15),
            dashboard_url: "http://localhost:5173".to_owned(),
            token_length: DEFAULT_TOKEN_LENGTH,
        }
    }
}

impl ForgotPasswordConfig {
    pub fn from_config(config: &PortfolioConfig) -> Self {
        Self {
            reset_expiry: config.tokens.reset_expiry,
            dashboard_url: config.dashboard_url.clone(),
            token_length: config.tokens.reset_token_length,
        }
    }
}

/// Outcome of a reset request. The plaintext token only travels by mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequested {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

pub struct ForgotPasswordAction<U: UserRepository> {
    user_repository: U,
    mailer: Arc<dyn MailSender>,
    config: ForgotPasswordConfig,
}

impl<U: UserRepository> ForgotPasswordAction<U> {
    pub fn new(user_repository: U, mailer: Arc<dyn MailSender>) -> Self {
        Self::with_config(user_repository, mailer, ForgotPasswordConfig::default())
    }

    pub fn with_config(
        user_repository: U,
        mailer: Arc<dyn MailSender>,
        config: ForgotPasswordConfig,
    ) -> Self {
        Self {
            user_repository,
            mailer,
            config,
        }
    }

    /// Stores a fresh reset token digest and mails the plaintext link.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` for an unknown email
    /// - `ServiceUnavailable` if the mail could not be sent; the stored token
    ///   is cleared first so no unreachable token stays valid
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "forgot_password", skip_all, err)
    )]
    pub async fn execute(&self, email: &str) -> Result<ResetRequested, AuthError> {
        require("email", Some(email))?;

        let user = self
            .user_repository
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = generate_token(self.config.token_length);
        let expires_at = Utc::now() + self.config.reset_expiry;
        self.user_repository
            .set_reset_token(user.id, &hash_token(&token), expires_at)
            .await?;

        let link = reset_link(&self.config.dashboard_url, &token);
        let (subject, body) = password_reset_message(&link, self.config.reset_expiry);

        if let Err(e) = self.mailer.send(&user.email, &subject, &body).await {
            log::error!(
                target: "portfolio_auth",
                "msg=\"reset mail failed\" user_id={} error=\"{e}\"",
                user.id
            );
            self.user_repository.clear_reset_token(user.id).await?;
            return Err(AuthError::ServiceUnavailable(
                "could not send the password reset email".to_owned(),
            ));
        }

        dispatch(AuthEvent::PasswordResetRequested {
            email: user.email.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"password reset requested\" user_id={}", user.id);

        Ok(ResetRequested {
            email: user.email,
            expires_at,
        })
    }
}
