#[macro_use]
mod common;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use common::{cleanup_user, db_pool, lazy_pool, login, register_and_login, test_config, unique_name};
use jsonwebtoken::{encode, EncodingKey, Header};
use projectpro::{
    auth::{generate_token, Claims},
    models::User,
};
use serde_json::json;

#[actix_rt::test]
async fn test_health_and_index_are_public() {
    let app = test_app!(lazy_pool(), test_config("postgres://unused"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "ProjectPro API");
}

#[actix_rt::test]
async fn test_missing_token_is_rejected() {
    let app = test_app!(lazy_pool(), test_config("postgres://unused"));

    for uri in ["/api/auth/me", "/api/projects/", "/api/tasks", "/api/tasks/kanban/1"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "GET {}", uri);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Not authenticated");
    }
}

#[actix_rt::test]
async fn test_malformed_and_tampered_tokens_are_rejected() {
    let config = test_config("postgres://unused");
    let app = test_app!(lazy_pool(), config.clone());

    let valid = generate_token("someone", &config.jwt).unwrap();
    let mut tampered = valid.clone();
    // Flip the last signature character.
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    for value in [
        "Bearer not-a-token".to_string(),
        format!("Bearer {}", tampered),
        format!("Basic {}", valid),
        "Bearer".to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/projects")
            .insert_header((header::AUTHORIZATION, value.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", value);
    }
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let config = test_config("postgres://unused");
    let app = test_app!(lazy_pool(), config.clone());

    let issued = chrono::Utc::now() - chrono::Duration::hours(3);
    let claims = Claims {
        sub: "someone".to_string(),
        iat: issued.timestamp() as usize,
        exp: (issued + chrono::Duration::minutes(30)).timestamp() as usize,
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_register_validation_errors() {
    let app = test_app!(lazy_pool(), test_config("postgres://unused"));

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "not-an-email",
            "username": "valid_name",
            "full_name": "Valid Name",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "missing@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["detail"].is_string());
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_register_login_and_me_flow() {
    let (pool, config) = db_pool().await;
    let app = test_app!(pool.clone(), config);

    let username = unique_name("auth_flow");
    let user = register_and_login(&app, &username).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(user.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.id);
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["full_name"], user.full_name.as_str());
    assert_eq!(body["is_active"], true);
    assert!(body.get("hashed_password").is_none());

    let me: User = serde_json::from_value(body).unwrap();
    assert_eq!(me.email, format!("{}@example.com", username));

    cleanup_user(&pool, &username).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_wrong_password_and_unknown_user() {
    let (pool, config) = db_pool().await;
    let app = test_app!(pool.clone(), config);

    let username = unique_name("auth_wrong_pw");
    register_and_login(&app, &username).await;

    for (name, password) in [
        (username.as_str(), "not-the-password"),
        ("definitely_not_registered_user", "Password123!"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/token")
            .set_form([("username", name), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Incorrect username or password");
    }

    cleanup_user(&pool, &username).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_registration_is_rejected() {
    let (pool, config) = db_pool().await;
    let app = test_app!(pool.clone(), config);

    let username = unique_name("auth_dup");
    register_and_login(&app, &username).await;

    // Same username, different email
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": format!("other_{}@example.com", username),
            "username": username,
            "full_name": "Someone Else",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Same email, different username
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": format!("{}@example.com", username),
            "username": format!("{}_x", username),
            "full_name": "Someone Else",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Email already registered");

    cleanup_user(&pool, &username).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_token_of_deleted_user_is_rejected() {
    let (pool, config) = db_pool().await;
    let app = test_app!(pool.clone(), config);

    let username = unique_name("auth_deleted");
    let user = register_and_login(&app, &username).await;
    let token = login(&app, &username, common::TEST_PASSWORD).await;
    cleanup_user(&pool, &username).await;

    for token in [user.token.as_str(), token.as_str()] {
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Could not validate credentials");
    }
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_deactivated_user_is_rejected() {
    let (pool, config) = db_pool().await;
    let app = test_app!(pool.clone(), config);

    let username = unique_name("auth_inactive");
    let user = register_and_login(&app, &username).await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await
        .expect("Failed to deactivate user");

    let req = test::TestRequest::post()
        .uri("/api/auth/token")
        .set_form([("username", username.as_str()), ("password", common::TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Incorrect username or password");

    // A token issued before deactivation no longer works either.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(user.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Inactive user");

    cleanup_user(&pool, &username).await;
}
