use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;
use crate::AuthError;

/// Reference to a file already stored on the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub public_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub linkedin_url: Option<String>,
}

/// The authenticated principal and its portfolio profile.
///
/// Secret fields are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub role: Role,
    #[serde(default)]
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    /// SHA-256 hex of the outstanding reset token, if any.
    #[serde(skip_serializing, default)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True if a reset token is stored and has not passed its expiry.
    pub fn has_active_reset_token(&self, now: DateTime<Utc>) -> bool {
        self.reset_password_token.is_some()
            && self.reset_password_expire.is_some_and(|expire| expire > now)
    }
}

/// Fields required to create an account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub hashed_password: String,
    pub role: Role,
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
}

/// Profile edit. Media references are replaced only when `Some`.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock() -> Self {
        Self::mock_from_credentials("owner@example.com", "fakehashedpassword")
    }

    pub fn mock_from_email(email: &str) -> Self {
        Self::mock_from_credentials(email, "fakehashedpassword")
    }

    pub fn mock_from_credentials(email: &str, hashed_password: &str) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            full_name: "Portfolio Owner".to_owned(),
            email: email.to_owned(),
            phone: "+10000000000".to_owned(),
            about_me: "Builds things.".to_owned(),
            role: Role::User,
            links: SocialLinks::default(),
            avatar: None,
            resume: None,
            hashed_password: hashed_password.to_owned(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Credential store contract.
///
/// Lookups return `Ok(None)` for a missing record. `Err` is reserved for store
/// failures, which callers surface as `ServiceUnavailable` or `DatabaseError`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    /// Looks a user up by the stored hash of a reset token, ignoring expiry.
    async fn find_user_by_reset_token(&self, token_hash: &str)
    -> Result<Option<User>, AuthError>;
    async fn list_users(&self) -> Result<Vec<User>, AuthError>;
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError>;
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User, AuthError>;
    async fn update_password(&self, id: Uuid, hashed_password: &str) -> Result<(), AuthError>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;
    async fn clear_reset_token(&self, id: Uuid) -> Result<(), AuthError>;
    /// Atomically clears the reset fields of the user holding `token_hash`
    /// and returns that user as it was before clearing.
    ///
    /// At most one caller gets `Some` for a given stored token. A SQL store
    /// does this with a single conditional `UPDATE ... RETURNING`.
    async fn consume_reset_token(&self, token_hash: &str) -> Result<Option<User>, AuthError>;
}
