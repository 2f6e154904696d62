use sqlx::SqlitePool;
use crate::db::models::{NewUser, User};

pub async fn create_user_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL CHECK (length(username) > 0),
            password TEXT NOT NULL CHECK (length(password) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Both values are bound as parameters; the statement text never changes.
/// Usernames are not unique, so the lowest id wins.
pub async fn find_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password FROM users WHERE username = ? AND password = ? ORDER BY id LIMIT 1",
    )
    .bind(username)
    .bind(password)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password)
        VALUES (?, ?)
        RETURNING id, username, password
        "#,
    )
    .bind(&user.username)
    .bind(&user.password)
    .fetch_one(pool)
    .await
}

/// Inserts `user` unless a record with the same username exists.
/// Returns whether a row was written.
pub async fn insert_user_if_absent(pool: &SqlitePool, user: &NewUser) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password)
        SELECT ?, ?
        WHERE NOT EXISTS (SELECT 1 FROM users WHERE username = ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.username)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}
