use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::models::{NewUser, User};
use crate::db::{CredentialStore, StoreError, validate};

/// Records held in process and matched by a linear equality scan.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        validate(user)?;
        let mut users = self.users.write().await;
        Ok(push(&mut users, user))
    }
}

fn push(users: &mut Vec<User>, user: &NewUser) -> User {
    let id = users.last().map_or(1, |u| u.id + 1);
    let stored = User {
        id,
        username: user.username.clone(),
        password: user.password.clone(),
    };
    users.push(stored.clone());
    stored
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user(&self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned())
    }

    async fn seed_user(&self, user: &NewUser) -> Result<bool, StoreError> {
        validate(user)?;
        // check and insert under the same write guard
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Ok(false);
        }
        push(&mut users, user);
        Ok(true)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(self.users.read().await.len() as i64)
    }
}
