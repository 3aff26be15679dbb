#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::{NewUser, ProfileUpdate, User, UserRepository};
use crate::AuthError;

/// In-memory credential store.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    fn modify<T>(&self, id: Uuid, f: impl FnOnce(&mut User) -> T) -> Result<T, AuthError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AuthError::UserNotFound)?;
        user.updated_at = Utc::now();
        Ok(f(user))
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.reset_password_token.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            full_name: new_user.full_name,
            email: new_user.email,
            phone: new_user.phone,
            about_me: new_user.about_me,
            role: new_user.role,
            links: new_user.links,
            avatar: new_user.avatar,
            resume: new_user.resume,
            hashed_password: new_user.hashed_password,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        drop(users);

        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User, AuthError> {
        self.modify(id, |user| {
            update.full_name.clone_into(&mut user.full_name);
            update.email.clone_into(&mut user.email);
            update.phone.clone_into(&mut user.phone);
            update.about_me.clone_into(&mut user.about_me);
            user.links = update.links.clone();
            if let Some(avatar) = &update.avatar {
                user.avatar = Some(avatar.clone());
            }
            if let Some(resume) = &update.resume {
                user.resume = Some(resume.clone());
            }
            user.clone()
        })
    }

    async fn update_password(&self, id: Uuid, hashed_password: &str) -> Result<(), AuthError> {
        self.modify(id, |user| {
            hashed_password.clone_into(&mut user.hashed_password);
        })
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.modify(id, |user| {
            user.reset_password_token = Some(token_hash.to_owned());
            user.reset_password_expire = Some(expires_at);
        })
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<(), AuthError> {
        self.modify(id, |user| {
            user.reset_password_token = None;
            user.reset_password_expire = None;
        })
    }

    async fn consume_reset_token(&self, token_hash: &str) -> Result<Option<User>, AuthError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users
            .iter_mut()
            .find(|u| u.reset_password_token.as_deref() == Some(token_hash))
        else {
            return Ok(None);
        };

        let before = user.clone();
        user.reset_password_token = None;
        user.reset_password_expire = None;
        user.updated_at = Utc::now();
        Ok(Some(before))
    }
}
