//! Outbound mail collaborator.
//!
//! Delivery transport is left to the host application; implement
//! [`MailSender`] over SMTP or an HTTP mail API. [`LogMailSender`] only logs.

mod message;

#[cfg(any(test, feature = "mocks"))]
mod mock;

use async_trait::async_trait;

pub use message::{password_reset_message, reset_link, welcome_message};
#[cfg(any(test, feature = "mocks"))]
pub use mock::{MockMailSender, SentMail};

use crate::AuthError;

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AuthError>;
}

/// Writes each message to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AuthError> {
        log::info!(
            target: "portfolio_auth::mail",
            "msg=\"mail not delivered, logged instead\" to=\"{to}\" subject=\"{subject}\" bytes={}",
            body.len()
        );
        log::debug!(target: "portfolio_auth::mail", "{body}");
        Ok(())
    }
}
