use sqlx::PgExecutor;

use crate::models::User;

const USER_COLUMNS: &str = "id, email, username, full_name, hashed_password, is_active, \
                            is_superuser, created_at, updated_at";

pub async fn find_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = $1",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(executor)
    .await
}

pub async fn exists<'e, E>(executor: E, user_id: i32) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

/// Which unique identity fields are already taken: `(email, username)`.
pub async fn identity_taken<'e, E>(
    executor: E,
    email: &str,
    username: &str,
) -> Result<(bool, bool), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, (bool, bool)>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1), \
                EXISTS(SELECT 1 FROM users WHERE username = $2)",
    )
    .bind(email)
    .bind(username)
    .fetch_one(executor)
    .await
}

pub async fn insert<'e, E>(
    executor: E,
    email: &str,
    username: &str,
    full_name: &str,
    hashed_password: &str,
) -> Result<User, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, username, full_name, hashed_password) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(email)
    .bind(username)
    .bind(full_name)
    .bind(hashed_password)
    .fetch_one(executor)
    .await
}
