//! Credential storage.
//!
//! Two backends implement [`CredentialStore`]: [`SqliteStore`], which talks to
//! a real database through bound parameters, and [`MemoryStore`], which scans
//! records held in process. Both compare values for exact equality.

pub mod memory;
pub mod models;
pub mod repo;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use memory::MemoryStore;
pub use models::{NewUser, User};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be reached or the statement failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid record: {0}")]
    InvalidRecord(&'static str),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the first record equal to `(username, password)` on both columns.
    async fn find_user(&self, username: &str, password: &str) -> Result<Option<User>, StoreError>;

    /// Inserts `user` unless its username is already present.
    /// Returns `true` when a record was written.
    async fn seed_user(&self, user: &NewUser) -> Result<bool, StoreError>;

    async fn count_users(&self) -> Result<i64, StoreError>;
}

pub(crate) fn validate(user: &NewUser) -> Result<(), StoreError> {
    if user.username.is_empty() {
        return Err(StoreError::InvalidRecord("username must not be empty"));
    }
    if user.password.is_empty() {
        return Err(StoreError::InvalidRecord("password must not be empty"));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens a pool for `database_url`, creating the database file if needed.
    ///
    /// An in-memory database lives inside a single connection, so those URLs
    /// get a pool of exactly one connection that is never recycled.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        repo::create_user_table(&self.pool).await?;
        tracing::debug!("users table ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Unconditional insert, for building fixtures with duplicate usernames.
    #[cfg(test)]
    pub(crate) async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        validate(user)?;
        Ok(repo::insert_user(&self.pool, user).await?)
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn find_user(&self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        Ok(repo::find_user(&self.pool, username, password).await?)
    }

    async fn seed_user(&self, user: &NewUser) -> Result<bool, StoreError> {
        validate(user)?;
        Ok(repo::insert_user_if_absent(&self.pool, user).await?)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(repo::count_users(&self.pool).await?)
    }
}
