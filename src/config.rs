//! Application configuration, read once from the environment at startup and
//! shared read-only with every worker through `web::Data<Config>`.

use jsonwebtoken::Algorithm;
use std::env;
use std::fmt;

/// Settings used to sign and verify access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub expire_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// Origin allowed by CORS in addition to the local dev frontend.
    pub frontend_url: String,
    pub jwt: JwtConfig,
}

/// Raised when a required variable is missing or a value does not parse.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so parsing can be
    /// exercised without mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let or_default =
            |key: &'static str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let algorithm = parse_algorithm(&or_default("JWT_ALGORITHM", "HS256"))?;

        let expire_minutes = parse_number::<i64>(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "30"),
        )?;
        if !(1..=MAX_EXPIRE_MINUTES).contains(&expire_minutes) {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: expire_minutes.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_number(
                "DATABASE_MAX_CONNECTIONS",
                or_default("DATABASE_MAX_CONNECTIONS", "5"),
            )?,
            server_port: parse_number("SERVER_PORT", or_default("SERVER_PORT", "8080"))?,
            server_host: or_default("SERVER_HOST", "127.0.0.1"),
            frontend_url: or_default("FRONTEND_URL", "http://localhost:3000"),
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                algorithm,
                expire_minutes,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Upper bound for `ACCESS_TOKEN_EXPIRE_MINUTES`: ten years.
const MAX_EXPIRE_MINUTES: i64 = 10 * 365 * 24 * 60;

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

// Tokens are signed with a shared secret, so only the HMAC family applies.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(ConfigError::Invalid {
            key: "JWT_ALGORITHM",
            value: value.to_string(),
        }),
    }
}
