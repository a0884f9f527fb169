use crate::{
    auth::{
        authenticate_user, generate_token, hash_password, AuthenticatedUser, TokenRequest,
        TokenResponse,
    },
    config::Config,
    db,
    error::AppError,
    models::UserInput,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Issue an access token
///
/// Accepts form-encoded `username` and `password` and returns a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": "...", "token_type": "bearer"}`.
/// - `401 Unauthorized`: Unknown user, wrong password or inactive account.
#[post("/token")]
pub async fn token(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    credentials: web::Form<TokenRequest>,
) -> Result<impl Responder, AppError> {
    let credentials = credentials.into_inner();

    let authenticated =
        authenticate_user(pool.get_ref(), &credentials.username, &credentials.password).await;
    let user = match authenticated {
        Ok(user) => user,
        Err(err) => {
            log::warn!("Failed login attempt for {:?}", credentials.username);
            return Err(err);
        }
    };

    let access_token = generate_token(&user.username, &config.jwt)?;
    log::info!("Issued access token for user {}", user.id);

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: The created user (without password hash).
/// - `400 Bad Request`: Email or username already taken.
/// - `422 Unprocessable Entity`: Field validation failed.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let input = register_data.into_inner();

    let (email_taken, username_taken) =
        db::users::identity_taken(pool.get_ref(), &input.email, &input.username).await?;
    if email_taken {
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    if username_taken {
        return Err(AppError::BadRequest("Username already taken".into()));
    }

    let hashed_password = hash_password(&input.password)?;
    let user = db::users::insert(
        pool.get_ref(),
        &input.email,
        &input.username,
        &input.full_name,
        &hashed_password,
    )
    .await?;

    log::info!("Registered user {} ({})", user.id, user.username);
    Ok(HttpResponse::Created().json(user))
}

/// The authenticated user
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(user.into_inner()))
}
