use chrono::Utc;
use uuid::Uuid;

use crate::events::{AuthEvent, dispatch};
use crate::validators::{validate_email, validate_name};
use crate::{AuthError, MediaAsset, ProfileUpdate, SocialLinks, User, UserRepository};

/// Partial profile edit. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    /// Each `Some` link replaces the stored one.
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
}

impl ProfileChanges {
    fn apply_to(self, user: &User) -> ProfileUpdate {
        let links = &user.links;
        ProfileUpdate {
            full_name: self.full_name.unwrap_or_else(|| user.full_name.clone()),
            email: self
                .email
                .map(|e| e.trim().to_owned())
                .unwrap_or_else(|| user.email.clone()),
            phone: self.phone.unwrap_or_else(|| user.phone.clone()),
            about_me: self.about_me.unwrap_or_else(|| user.about_me.clone()),
            links: SocialLinks {
                portfolio_url: self.links.portfolio_url.or_else(|| links.portfolio_url.clone()),
                github_url: self.links.github_url.or_else(|| links.github_url.clone()),
                instagram_url: self.links.instagram_url.or_else(|| links.instagram_url.clone()),
                twitter_url: self.links.twitter_url.or_else(|| links.twitter_url.clone()),
                facebook_url: self.links.facebook_url.or_else(|| links.facebook_url.clone()),
                linkedin_url: self.links.linkedin_url.or_else(|| links.linkedin_url.clone()),
            },
            avatar: self.avatar,
            resume: self.resume,
        }
    }
}

pub struct UpdateProfileAction<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> UpdateProfileAction<U> {
    pub fn new(user_repository: U) -> Self {
        Self { user_repository }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_profile", skip_all, err)
    )]
    pub async fn execute(&self, user_id: Uuid, changes: ProfileChanges) -> Result<User, AuthError> {
        let current = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let update = changes.apply_to(&current);
        validate_name(&update.full_name)?;
        validate_email(&update.email)?;

        if !update.email.eq_ignore_ascii_case(&current.email) {
            let taken = self.user_repository.find_user_by_email(&update.email).await?;
            if taken.is_some_and(|other| other.id != user_id) {
                return Err(AuthError::UserAlreadyExists);
            }
        }

        let user = self.user_repository.update_profile(user_id, &update).await?;

        dispatch(AuthEvent::ProfileUpdated {
            user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"profile updated\" user_id={user_id}");

        Ok(user)
    }
}
