use chrono::Utc;
use uuid::Uuid;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::events::{AuthEvent, dispatch};
use crate::validators::{PasswordPolicy, require};
use crate::{AuthError, SecretString, UserRepository};

pub struct ChangePasswordAction<U, H = Argon2Hasher>
where
    U: UserRepository,
{
    user_repository: U,
    password_policy: PasswordPolicy,
    hasher: H,
}

impl<U: UserRepository> ChangePasswordAction<U, Argon2Hasher> {
    pub fn new(user_repository: U) -> Self {
        Self::with_hasher(user_repository, PasswordPolicy::default(), Argon2Hasher::default())
    }
}

impl<U: UserRepository, H: PasswordHasher> ChangePasswordAction<U, H> {
    pub fn with_hasher(user_repository: U, password_policy: PasswordPolicy, hasher: H) -> Self {
        Self {
            user_repository,
            password_policy,
            hasher,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "change_password", skip_all, err)
    )]
    pub async fn execute(
        &self,
        user_id: Uuid,
        current_password: &SecretString,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<(), AuthError> {
        require("current_password", Some(current_password.expose_secret()))?;
        require("new_password", Some(new_password.expose_secret()))?;
        require("confirm_new_password", Some(confirm_password.expose_secret()))?;

        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .hasher
            .compare(current_password.expose_secret(), &user.hashed_password)?
        {
            return Err(AuthError::IncorrectPassword);
        }

        if new_password.expose_secret() != confirm_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }

        self.password_policy.validate(new_password.expose_secret())?;

        let hashed = self.hasher.hash(new_password.expose_secret())?;
        self.user_repository.update_password(user_id, &hashed).await?;

        dispatch(AuthEvent::PasswordChanged {
            user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"password changed\" user_id={user_id}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::ValidationError;
    use crate::{MockUserRepository, User};

    fn secret(s: &str) -> SecretString {
        SecretString::new(s)
    }

    fn setup(password: &str) -> (MockUserRepository, User) {
        let hashed = Argon2Hasher::default().hash(password).unwrap();
        let user = User::mock_from_credentials("ada@example.com", &hashed);
        (MockUserRepository::with_users(vec![user.clone()]), user)
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let (repo, user) = setup("old-password");
        let action = ChangePasswordAction::new(repo.clone());

        action
            .execute(
                user.id,
                &secret("old-password"),
                &secret("new-password"),
                &secret("new-password"),
            )
            .await
            .unwrap();

        let stored = repo.find_user_by_id(user.id).await.unwrap().unwrap();
        let hasher = Argon2Hasher::default();
        assert!(hasher.compare("new-password", &stored.hashed_password).unwrap());
        assert!(!hasher.compare("old-password", &stored.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn test_wrong_current_password() {
        let (repo, user) = setup("old-password");
        let action = ChangePasswordAction::new(repo);

        let result = action
            .execute(
                user.id,
                &secret("not-the-password"),
                &secret("new-password"),
                &secret("new-password"),
            )
            .await;
        assert_eq!(result.unwrap_err(), AuthError::IncorrectPassword);
    }

    #[tokio::test]
    async fn test_confirmation_mismatch() {
        let (repo, user) = setup("old-password");
        let action = ChangePasswordAction::new(repo);

        let result = action
            .execute(
                user.id,
                &secret("old-password"),
                &secret("new-password"),
                &secret("new-passw0rd"),
            )
            .await;
        assert_eq!(result.unwrap_err(), AuthError::PasswordMismatch);
    }

    #[tokio::test]
    async fn test_empty_fields_and_policy() {
        let (repo, user) = setup("old-password");
        let action = ChangePasswordAction::new(repo);

        let empty = action
            .execute(user.id, &secret(""), &secret("new-password"), &secret("new-password"))
            .await;
        assert_eq!(
            empty.unwrap_err(),
            AuthError::Validation(ValidationError::Required("current_password"))
        );

        let weak = action
            .execute(user.id, &secret("old-password"), &secret("short"), &secret("short"))
            .await;
        assert_eq!(
            weak.unwrap_err(),
            AuthError::Validation(ValidationError::PasswordTooShort(8))
        );
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let action = ChangePasswordAction::new(MockUserRepository::new());
        let result = action
            .execute(
                Uuid::new_v4(),
                &secret("old-password"),
                &secret("new-password"),
                &secret("new-password"),
            )
            .await;
        assert_eq!(result.unwrap_err(), AuthError::UserNotFound);
    }
}
