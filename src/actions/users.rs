use uuid::Uuid;

use crate::{AuthError, User, UserRepository};

/// Looks up the account shown on the public portfolio page.
pub struct GetPortfolioOwnerAction<U: UserRepository> {
    user_repository: U,
    owner: Option<Uuid>,
}

impl<U: UserRepository> GetPortfolioOwnerAction<U> {
    pub fn new(user_repository: U, owner: Option<Uuid>) -> Self {
        Self {
            user_repository,
            owner,
        }
    }

    /// `NotFound` when no owner is configured or the account is gone.
    pub async fn execute(&self) -> Result<User, AuthError> {
        let Some(owner) = self.owner else {
            log::warn!(target: "portfolio_auth", "msg=\"portfolio owner not configured\"");
            return Err(AuthError::NotFound);
        };

        self.user_repository
            .find_user_by_id(owner)
            .await?
            .ok_or(AuthError::NotFound)
    }
}

pub struct ListUsersAction<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> ListUsersAction<U> {
    pub fn new(user_repository: U) -> Self {
        Self { user_repository }
    }

    pub async fn execute(&self) -> Result<Vec<User>, AuthError> {
        self.user_repository.list_users().await
    }
}
