//! Credential verification.
//!
//! Submitted values are opaque data: they are handed to the store for an
//! equality comparison and never become part of any statement text.

use thiserror::Error;

use crate::db::{CredentialStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Carries the stored username of the matched record.
    Match(String),
    NoMatch,
}

#[derive(Error, Debug)]
pub enum VerifyError {
    /// The display text stays generic; the cause is only reachable via `source()`.
    #[error("credential storage unavailable")]
    Storage(#[source] StoreError),
}

pub async fn verify(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<Verdict, VerifyError> {
    match store.find_user(username, password).await {
        Ok(Some(user)) => {
            tracing::debug!(username = %user.username, user_id = user.id, "credentials matched");
            Ok(Verdict::Match(user.username))
        }
        Ok(None) => {
            tracing::debug!(username = %username.escape_debug(), "no matching credentials");
            Ok(Verdict::NoMatch)
        }
        Err(err) => Err(VerifyError::Storage(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, NewUser, SqliteStore};

    const PAYLOADS: &[&str] = &[
        "' OR '1'='1",
        "' OR 1=1 --",
        "admin' --",
        "admin'/*",
        "'; DROP TABLE users; --",
        "\" OR \"\"=\"",
        "admin\0",
        "' UNION SELECT 1, 'admin', 'password123' --",
    ];

    async fn sqlite() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.init().await.unwrap();
        store
            .seed_user(&NewUser::new("admin", "password123"))
            .await
            .unwrap();
        store
    }

    async fn memory() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .seed_user(&NewUser::new("admin", "password123"))
            .await
            .unwrap();
        store
    }

    async fn check_exact_match(store: &dyn CredentialStore) {
        let verdict = verify(store, "admin", "password123").await.unwrap();
        assert_eq!(verdict, Verdict::Match("admin".to_string()));
    }

    async fn check_injection(store: &dyn CredentialStore) {
        for payload in PAYLOADS {
            for (u, p) in [(*payload, *payload), ("admin", *payload), (*payload, "password123")] {
                let verdict = verify(store, u, p).await.unwrap();
                assert_eq!(verdict, Verdict::NoMatch, "payload ({u:?}, {p:?})");
            }
        }
        assert_eq!(
            verify(store, "admin' --", "anything").await.unwrap(),
            Verdict::NoMatch
        );
        // the table must still be intact after the DROP payload
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sqlite_exact_match() {
        check_exact_match(&sqlite().await).await;
    }

    #[tokio::test]
    async fn memory_exact_match() {
        check_exact_match(&memory().await).await;
    }

    #[tokio::test]
    async fn sqlite_injection_payloads_never_match() {
        check_injection(&sqlite().await).await;
    }

    #[tokio::test]
    async fn memory_injection_payloads_never_match() {
        check_injection(&memory().await).await;
    }

    #[tokio::test]
    async fn empty_input_is_no_match() {
        let store = sqlite().await;
        assert_eq!(verify(&store, "", "").await.unwrap(), Verdict::NoMatch);
        assert_eq!(verify(&memory().await, "", "").await.unwrap(), Verdict::NoMatch);
    }

    #[tokio::test]
    async fn stored_metacharacters_match_only_exactly() {
        let store = sqlite().await;
        store
            .insert_user(&NewUser::new("o'brien", "p' OR '1'='1"))
            .await
            .unwrap();

        assert_eq!(
            verify(&store, "o'brien", "p' OR '1'='1").await.unwrap(),
            Verdict::Match("o'brien".to_string())
        );
        assert_eq!(
            verify(&store, "o'brien", "' OR '1'='1").await.unwrap(),
            Verdict::NoMatch
        );
    }

    #[tokio::test]
    async fn comparison_is_case_and_whitespace_sensitive() {
        let store = sqlite().await;
        for (u, p) in [
            ("ADMIN", "password123"),
            ("admin ", "password123"),
            ("admin", "PASSWORD123"),
            (" admin", "password123"),
        ] {
            assert_eq!(verify(&store, u, p).await.unwrap(), Verdict::NoMatch);
        }
    }

    #[tokio::test]
    async fn storage_failure_is_distinct_and_generic() {
        let store = sqlite().await;
        store.close().await;

        let err = verify(&store, "admin", "password123").await.unwrap_err();
        assert!(matches!(err, VerifyError::Storage(StoreError::Database(_))));
        assert_eq!(err.to_string(), "credential storage unavailable");
        assert!(std::error::Error::source(&err).is_some());
    }
}
