use chrono::Utc;

use crate::crypto::{Argon2Hasher, PasswordHasher, hash_token};
use crate::events::{AuthEvent, dispatch};
use crate::validators::PasswordPolicy;
use crate::{AuthError, SecretString, SessionToken, TokenCodec, User, UserRepository};

pub struct ResetPasswordAction<U, H = Argon2Hasher>
where
    U: UserRepository,
{
    user_repository: U,
    codec: TokenCodec,
    password_policy: PasswordPolicy,
    hasher: H,
}

impl<U: UserRepository> ResetPasswordAction<U, Argon2Hasher> {
    pub fn new(user_repository: U, codec: TokenCodec) -> Self {
        Self::with_hasher(
            user_repository,
            codec,
            PasswordPolicy::default(),
            Argon2Hasher::default(),
        )
    }
}

impl<U: UserRepository, H: PasswordHasher> ResetPasswordAction<U, H> {
    pub fn with_hasher(
        user_repository: U,
        codec: TokenCodec,
        password_policy: PasswordPolicy,
        hasher: H,
    ) -> Self {
        Self {
            user_repository,
            codec,
            password_policy,
            hasher,
        }
    }

    /// Redeems a mailed reset token and signs the user straight in.
    ///
    /// # Errors
    ///
    /// - `ResetTokenInvalid` if no user holds the token or it has expired
    /// - `Validation` if the new password breaks the policy
    /// - `PasswordMismatch` if the confirmation differs
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "reset_password", skip_all, err)
    )]
    pub async fn execute(
        &self,
        token: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(User, SessionToken), AuthError> {
        let digest = hash_token(token);
        let user = self
            .user_repository
            .find_user_by_reset_token(&digest)
            .await?
            .ok_or(AuthError::ResetTokenInvalid)?;

        if !user.has_active_reset_token(Utc::now()) {
            log::info!(target: "portfolio_auth", "msg=\"expired reset token presented\" user_id={}", user.id);
            self.user_repository.clear_reset_token(user.id).await?;
            return Err(AuthError::ResetTokenInvalid);
        }

        self.password_policy.validate(password.expose_secret())?;
        if password.expose_secret() != confirm.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }

        // claim the token; of two concurrent redemptions only one gets it back
        let claimed = self
            .user_repository
            .consume_reset_token(&digest)
            .await?
            .filter(|claimed| claimed.id == user.id && claimed.has_active_reset_token(Utc::now()));
        if claimed.is_none() {
            log::warn!(target: "portfolio_auth", "msg=\"reset token already redeemed\" user_id={}", user.id);
            return Err(AuthError::ResetTokenInvalid);
        }

        let hashed = self.hasher.hash(password.expose_secret())?;
        self.user_repository.update_password(user.id, &hashed).await?;

        let session = self.codec.issue(user.id)?;

        dispatch(AuthEvent::PasswordResetCompleted {
            user_id: user.id,
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"password reset completed\" user_id={}", user.id);

        let user = self
            .user_repository
            .find_user_by_id(user.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok((user, session))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::validators::ValidationError;
    use crate::{MockUserRepository, SessionTokenConfig};

    const PLAINTEXT: &str = "Zx81ResetTokenForTestsOnly000000";

    fn codec() -> TokenCodec {
        TokenCodec::new(SessionTokenConfig::new("test-secret-32-bytes-long-key-01").unwrap())
    }

    async fn repo_with_token(expires_in: Duration) -> (MockUserRepository, User) {
        let user = User::mock_from_email("ada@example.com");
        let repo = MockUserRepository::with_users(vec![user.clone()]);
        repo.set_reset_token(user.id, &hash_token(PLAINTEXT), Utc::now() + expires_in)
            .await
            .unwrap();
        (repo, user)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::new(s)
    }

    #[tokio::test]
    async fn test_reset_success() {
        let (repo, user) = repo_with_token(Duration::minutes(15)).await;
        let codec = codec();
        let action = ResetPasswordAction::new(repo.clone(), codec.clone());

        let (updated, session) = action
            .execute(PLAINTEXT, &secret("brand-new-password"), &secret("brand-new-password"))
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert!(updated.reset_password_token.is_none());
        assert!(updated.reset_password_expire.is_none());
        assert!(Argon2Hasher::default()
            .compare("brand-new-password", &updated.hashed_password)
            .unwrap());
        assert_eq!(codec.verify(session.token.expose_secret()).unwrap(), user.id);

        // single use
        let again = action
            .execute(PLAINTEXT, &secret("another-password"), &secret("another-password"))
            .await;
        assert_eq!(again.unwrap_err(), AuthError::ResetTokenInvalid);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (repo, _) = repo_with_token(Duration::minutes(15)).await;
        let action = ResetPasswordAction::new(repo, codec());

        let result = action
            .execute("wrong-token", &secret("brand-new-password"), &secret("brand-new-password"))
            .await;
        assert_eq!(result.unwrap_err(), AuthError::ResetTokenInvalid);
    }

    #[tokio::test]
    async fn test_expired_token_is_cleared() {
        let (repo, user) = repo_with_token(Duration::minutes(-1)).await;
        let action = ResetPasswordAction::new(repo.clone(), codec());

        let result = action
            .execute(PLAINTEXT, &secret("brand-new-password"), &secret("brand-new-password"))
            .await;
        assert_eq!(result.unwrap_err(), AuthError::ResetTokenInvalid);

        let stored = repo.find_user_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.reset_password_token.is_none());
        assert_eq!(stored.hashed_password, user.hashed_password);
    }

    #[tokio::test]
    async fn test_confirmation_mismatch_keeps_token() {
        let (repo, user) = repo_with_token(Duration::minutes(15)).await;
        let action = ResetPasswordAction::new(repo.clone(), codec());

        let result = action
            .execute(PLAINTEXT, &secret("brand-new-password"), &secret("brand-new-passw0rd"))
            .await;
        assert_eq!(result.unwrap_err(), AuthError::PasswordMismatch);

        let stored = repo.find_user_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.reset_password_token.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_redemption_succeeds_once() {
        let (repo, _) = repo_with_token(Duration::minutes(15)).await;
        let codec = codec();

        let attempts: Vec<_> = ["first-new-password", "second-new-password"]
            .into_iter()
            .map(|password| {
                let action = ResetPasswordAction::new(repo.clone(), codec.clone());
                tokio::spawn(async move {
                    action
                        .execute(PLAINTEXT, &secret(password), &secret(password))
                        .await
                })
            })
            .collect();

        let mut redeemed = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => redeemed += 1,
                Err(err) => assert_eq!(err, AuthError::ResetTokenInvalid),
            }
        }
        assert_eq!(redeemed, 1);
    }

    #[tokio::test]
    async fn test_weak_password() {
        let (repo, _) = repo_with_token(Duration::minutes(15)).await;
        let action = ResetPasswordAction::new(repo, codec());

        let result = action.execute(PLAINTEXT, &secret("short"), &secret("short")).await;
        assert_eq!(
            result.unwrap_err(),
            AuthError::Validation(ValidationError::PasswordTooShort(8))
        );
    }
}
