#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test,
};
use projectpro::{config::Config, models::User};
use serde_json::json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_JWT_SECRET: &str = "integration_test_secret";

/// Builds the same app as `main`, wired to the given pool and config.
macro_rules! test_app {
    ($pool:expr, $config:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool))
                .app_data(actix_web::web::Data::new($config))
                .wrap(actix_web::middleware::NormalizePath::trim())
                .wrap(
                    actix_cors::Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .wrap(actix_web::middleware::Logger::default())
                .service(projectpro::routes::health::index)
                .service(projectpro::routes::health::health)
                .service(
                    actix_web::web::scope("/api")
                        .wrap(projectpro::auth::AuthMiddleware)
                        .configure(projectpro::routes::config),
                ),
        )
        .await
    };
}

pub fn test_config(database_url: &str) -> Config {
    let database_url = database_url.to_string();
    Config::from_lookup(move |key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
        _ => None,
    })
    .expect("test config must be valid")
}

/// A pool that never connects unless a query actually runs.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/projectpro_unused")
        .expect("lazy pool")
}

/// Connects to `DATABASE_URL` and applies migrations. Tests using this are
/// `#[ignore]`d and run with `cargo test -- --ignored`.
pub async fn db_pool() -> (PgPool, Config) {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    projectpro::db::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, test_config(&database_url))
}

/// Process-unique username with the given prefix.
pub fn unique_name(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!(
        "{}_{}_{}",
        prefix,
        nanos,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

pub async fn cleanup_user(pool: &PgPool, username: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await;
}

pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub const TEST_PASSWORD: &str = "Password123!";

/// Registers `username` and logs in through the token endpoint.
pub async fn register_and_login<S, B>(app: &S, username: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let full_name = format!("{} Tester", username);
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": format!("{}@example.com", username),
            "username": username,
            "full_name": full_name,
            "password": TEST_PASSWORD
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "registration failed");
    let user: User = test::read_body_json(resp).await;

    let token = login(app, username, TEST_PASSWORD).await;

    TestUser {
        id: user.id,
        username: username.to_string(),
        full_name,
        token,
    }
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/token")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login failed");
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    body["access_token"]
        .as_str()
        .expect("access_token must be a string")
        .to_string()
}
