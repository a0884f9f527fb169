pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::{db, error::AppError, models::User};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Form-encoded credentials posted to the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Extracts the token from an `Authorization` header value of the form
/// `Bearer <token>`. The scheme is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

lazy_static! {
    /// Hash checked when the username is unknown, so that path costs as much as
    /// a wrong password.
    static ref DUMMY_HASH: Option<String> = hash_password("projectpro-no-such-user").ok();
}

/// Looks up `username` and checks `password` against the stored hash.
///
/// Unknown users, wrong passwords and deactivated accounts all yield the same
/// `Unauthorized` error.
pub async fn authenticate_user<'e, E>(
    executor: E,
    username: &str,
    password: &str,
) -> Result<User, AppError>
where
    E: PgExecutor<'e>,
{
    let invalid = || AppError::Unauthorized("Incorrect username or password".into());

    let user = match db::users::find_by_username(executor, username).await? {
        Some(user) => user,
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(invalid());
        }
    };

    if !verify_password(password, &user.hashed_password)? || !user.is_active {
        return Err(invalid());
    }

    Ok(user)
}
