//! User repository
//!
//! Stores principals and their credential hashes. Emails are unique after
//! normalization.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::auth::models::{NewUser, User};
use crate::domain::UserId;
use crate::errors::{Error, Result};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;
    /// Look up a user with its stored password hash for login.
    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<(User, String)>>;
}

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

/// Process-local user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<UserId, UserRecord>,
    /// normalized email -> user id
    emails: DashMap<String, UserId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let email = User::normalize_email(&new_user.email);

        // The email shard stays locked until the record is stored, so a lookup
        // by email never sees a reserved address without its user.
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => {
                Err(Error::conflict(format!("Email '{}' is already registered", email)))
            }
            Entry::Vacant(slot) => {
                let user = User { id: new_user.id.clone(), email, created: Utc::now() };
                self.users.insert(
                    new_user.id.clone(),
                    UserRecord { user: user.clone(), password_hash: new_user.password_hash },
                );
                slot.insert(new_user.id);
                Ok(user)
            }
        }
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|record| record.user.clone()))
    }

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<(User, String)>> {
        let email = User::normalize_email(email);
        let Some(id) = self.emails.get(&email).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(self
            .users
            .get(&id)
            .map(|record| (record.user.clone(), record.password_hash.clone())))
    }
}
