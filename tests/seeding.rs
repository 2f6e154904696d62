//! Startup seeding against a database file that outlives each bootstrap.

use shack_o_target::api::server::bootstrap;
use shack_o_target::config::AppConfig;
use shack_o_target::db::SqliteStore;
use shack_o_target::db::CredentialStore;
use shack_o_target::verifier::{Verdict, verify};

fn config_for(dir: &tempfile::TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.database_url = format!("sqlite://{}", dir.path().join("shack.db").display());
    config
}

#[tokio::test]
async fn repeated_bootstrap_does_not_duplicate_seed() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);

    for _ in 0..3 {
        let store = bootstrap(&config).await.unwrap();
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    let store = SqliteStore::connect(&config.storage.database_url).await.unwrap();
    assert_eq!(
        verify(&store, "admin", "password123").await.unwrap(),
        Verdict::Match("admin".to_string())
    );
}

#[tokio::test]
async fn existing_seed_username_keeps_its_password() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&dir);
    bootstrap(&config).await.unwrap();

    config.seed.password = "changed".to_string();
    let store = bootstrap(&config).await.unwrap();

    assert_eq!(store.count_users().await.unwrap(), 1);
    assert_eq!(
        verify(store.as_ref(), "admin", "changed").await.unwrap(),
        Verdict::NoMatch
    );
    assert_eq!(
        verify(store.as_ref(), "admin", "password123").await.unwrap(),
        Verdict::Match("admin".to_string())
    );
}
