use chrono::Utc;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::events::{AuthEvent, dispatch};
use crate::validators::require;
use crate::{AuthError, SecretString, SessionToken, TokenCodec, User, UserRepository};

pub struct LoginAction<U, H = Argon2Hasher>
where
    U: UserRepository,
{
    user_repository: U,
    codec: TokenCodec,
    hasher: H,
}

impl<U: UserRepository> LoginAction<U, Argon2Hasher> {
    pub fn new(user_repository: U, codec: TokenCodec) -> Self {
        Self::with_hasher(user_repository, codec, Argon2Hasher::default())
    }
}

impl<U: UserRepository, H: PasswordHasher> LoginAction<U, H> {
    pub fn with_hasher(user_repository: U, codec: TokenCodec, hasher: H) -> Self {
        Self {
            user_repository,
            codec,
            hasher,
        }
    }

    /// Checks the credentials and issues a session token.
    ///
    /// An unknown email and a wrong password both return `InvalidCredentials`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(User, SessionToken), AuthError> {
        require("email", Some(email))?;
        require("password", Some(password.expose_secret()))?;

        let email = email.trim();
        let Some(user) = self.user_repository.find_user_by_email(email).await? else {
            // Spend one hash so an unknown email costs about as much as a wrong password.
            let _ = self.hasher.hash(password.expose_secret());
            self.reject(email, "unknown email").await;
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .compare(password.expose_secret(), &user.hashed_password)?
        {
            self.reject(email, "invalid password").await;
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.codec.issue(user.id)?;

        dispatch(AuthEvent::LoginSuccess {
            user_id: user.id,
            email: user.email.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"login success\" user_id={}", user.id);

        Ok((user, token))
    }

    async fn reject(&self, email: &str, reason: &str) {
        log::info!(target: "portfolio_auth", "msg=\"login failed\" reason=\"{reason}\"");
        dispatch(AuthEvent::LoginFailed {
            email: email.to_owned(),
            reason: reason.to_owned(),
            at: Utc::now(),
        })
        .await;
    }
}
