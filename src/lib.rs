//! Authentication and content backend for a personal portfolio.
//!
//! Sessions are stateless signed tokens carried in a `token` cookie. A request
//! passes through the [`session::SessionVerifier`] (token to principal) and an
//! optional [`session::RoleGate`] before reaching a handler.

pub mod actions;
pub mod api;
pub mod config;
pub mod crypto;
pub mod deliverability;
pub mod events;
pub mod mail;
pub mod repository;
pub mod secret;
pub mod session;
pub mod timeline;
pub mod token;
pub mod validators;

use std::fmt;

pub use config::PortfolioConfig;
pub use events::{AuthEvent, register_event_listeners};
pub use repository::{MediaAsset, NewUser, ProfileUpdate, Role, SocialLinks, User, UserRepository};
pub use secret::SecretString;
pub use session::{CookieConfig, RequestContext, RoleGate, SessionVerifier};
pub use timeline::{NewTimelineEntry, TimelineEntry, TimelineRepository, TimelineSpan};
pub use token::{SessionToken, SessionTokenConfig, TokenCodec};
use validators::ValidationError;

#[cfg(any(test, feature = "mocks"))]
pub use repository::MockUserRepository;
#[cfg(any(test, feature = "mocks"))]
pub use timeline::MockTimelineRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    UserNotFound,
    UserAlreadyExists,
    InvalidCredentials,
    Unauthenticated,
    Forbidden,
    TokenExpired,
    InvalidSignature,
    MalformedToken,
    ResetTokenInvalid,
    PasswordMismatch,
    IncorrectPassword,
    UndeliverableEmail,
    Validation(ValidationError),
    PasswordHashError,
    NotFound,
    ServiceUnavailable(String),
    ConfigurationError(String),
    DatabaseError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::UserAlreadyExists => write!(f, "User already exists"),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::Unauthenticated => write!(f, "User not authenticated"),
            AuthError::Forbidden => write!(f, "Not allowed to access this resource"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::ResetTokenInvalid => {
                write!(f, "Reset password token is invalid or has expired")
            }
            AuthError::PasswordMismatch => write!(f, "Password and confirmation do not match"),
            AuthError::IncorrectPassword => write!(f, "Incorrect current password"),
            AuthError::UndeliverableEmail => {
                write!(f, "Invalid email, please use a deliverable address")
            }
            AuthError::Validation(err) => write!(f, "{err}"),
            AuthError::PasswordHashError => write!(f, "Failed to hash password"),
            AuthError::NotFound => write!(f, "Resource not found"),
            AuthError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        AuthError::Validation(err)
    }
}

impl AuthError {
    /// True for every failure the session verifier reports as a missing identity.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthenticated
                | AuthError::TokenExpired
                | AuthError::InvalidSignature
                | AuthError::MalformedToken
        )
    }
}
