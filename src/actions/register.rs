use std::sync::Arc;

use chrono::Utc;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::deliverability::EmailVerifier;
use crate::events::{AuthEvent, dispatch};
use crate::mail::{MailSender, welcome_message};
use crate::validators::{validate_email, validate_name, validate_password};
use crate::{AuthError, MediaAsset, NewUser, Role, SecretString, SocialLinks, User, UserRepository};

/// Account details submitted at registration.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub password: SecretString,
    /// Defaults to [`Role::User`]. The HTTP layer never lets clients pick it.
    pub role: Role,
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
}

pub struct RegisterAction<U, H = Argon2Hasher>
where
    U: UserRepository,
{
    user_repository: U,
    email_verifier: Arc<dyn EmailVerifier>,
    mailer: Arc<dyn MailSender>,
    hasher: H,
}

impl<U: UserRepository> RegisterAction<U, Argon2Hasher> {
    pub fn new(
        user_repository: U,
        email_verifier: Arc<dyn EmailVerifier>,
        mailer: Arc<dyn MailSender>,
    ) -> Self {
        Self::with_hasher(user_repository, email_verifier, mailer, Argon2Hasher::default())
    }
}

impl<U: UserRepository, H: PasswordHasher> RegisterAction<U, H> {
    pub fn with_hasher(
        user_repository: U,
        email_verifier: Arc<dyn EmailVerifier>,
        mailer: Arc<dyn MailSender>,
        hasher: H,
    ) -> Self {
        Self {
            user_repository,
            email_verifier,
            mailer,
            hasher,
        }
    }

    /// Creates the account. The welcome mail is best effort.
    ///
    /// # Errors
    ///
    /// - `Validation` for a bad name, email or password
    /// - `UndeliverableEmail` if the deliverability check rejects the address
    /// - `UserAlreadyExists` if the email is taken
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "register", skip_all, err)
    )]
    pub async fn execute(&self, registration: Registration) -> Result<User, AuthError> {
        let email = registration.email.trim().to_owned();

        validate_name(&registration.full_name)?;
        validate_email(&email)?;
        validate_password(registration.password.expose_secret())?;

        if !self.email_verifier.is_deliverable(&email).await {
            log::info!(target: "portfolio_auth", "msg=\"registration rejected\" reason=\"undeliverable email\"");
            return Err(AuthError::UndeliverableEmail);
        }

        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let hashed_password = self.hasher.hash(registration.password.expose_secret())?;
        let user = self
            .user_repository
            .create_user(NewUser {
                full_name: registration.full_name.trim().to_owned(),
                email,
                phone: registration.phone,
                about_me: registration.about_me,
                hashed_password,
                role: registration.role,
                links: registration.links,
                avatar: registration.avatar,
                resume: registration.resume,
            })
            .await?;

        let (subject, body) = welcome_message(&user.full_name);
        if let Err(e) = self.mailer.send(&user.email, &subject, &body).await {
            log::warn!(
                target: "portfolio_auth",
                "msg=\"welcome mail not sent\" user_id={} error=\"{e}\"",
                user.id
            );
        }

        dispatch(AuthEvent::UserRegistered {
            user_id: user.id,
            email: user.email.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"user registered\" user_id={}", user.id);

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockUserRepository;
    use crate::deliverability::MockEmailVerifier;
    use crate::mail::MockMailSender;
    use crate::validators::ValidationError;

    fn registration(email: &str) -> Registration {
        Registration {
            full_name: "Ada Lovelace".to_owned(),
            email: email.to_owned(),
            password: SecretString::new("analytical-engine"),
            ..Default::default()
        }
    }

    fn action(
        repo: MockUserRepository,
        mailer: MockMailSender,
    ) -> RegisterAction<MockUserRepository> {
        RegisterAction::new(
            repo,
            Arc::new(MockEmailVerifier::rejecting(["bounce@example.com"])),
            Arc::new(mailer),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let repo = MockUserRepository::new();
        let mailer = MockMailSender::new();
        let action = action(repo.clone(), mailer.clone());

        let user = action.execute(registration("ada@example.com")).await.unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.hashed_password, "analytical-engine");
        assert!(Argon2Hasher::default()
            .compare("analytical-engine", &user.hashed_password)
            .unwrap());
        assert!(mailer.last_to("ada@example.com").is_some());
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let repo = MockUserRepository::with_users(vec![User::mock_from_email("ada@example.com")]);
        let action = action(repo, MockMailSender::new());

        let result = action.execute(registration("ada@example.com")).await;
        assert_eq!(result.unwrap_err(), AuthError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_register_undeliverable_email() {
        let repo = MockUserRepository::new();
        let action = action(repo.clone(), MockMailSender::new());

        let result = action.execute(registration("bounce@example.com")).await;
        assert_eq!(result.unwrap_err(), AuthError::UndeliverableEmail);
        assert!(repo.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let action = action(MockUserRepository::new(), MockMailSender::new());

        let short = Registration {
            password: SecretString::new("short"),
            ..registration("ada@example.com")
        };
        assert_eq!(
            action.execute(short).await.unwrap_err(),
            AuthError::Validation(ValidationError::PasswordTooShort(8))
        );

        let bad_email = registration("not-an-email");
        assert_eq!(
            action.execute(bad_email).await.unwrap_err(),
            AuthError::Validation(ValidationError::EmailInvalidFormat)
        );

        let no_name = Registration {
            full_name: "   ".to_owned(),
            ..registration("ada@example.com")
        };
        assert_eq!(
            action.execute(no_name).await.unwrap_err(),
            AuthError::Validation(ValidationError::NameEmpty)
        );
    }

    #[tokio::test]
    async fn test_register_survives_mail_failure() {
        let repo = MockUserRepository::new();
        let action = action(repo.clone(), MockMailSender::failing());

        let result = action.execute(registration("ada@example.com")).await;
        assert!(result.is_ok());
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }
}
