use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::{
    auth::{bearer_token, token::verify_token},
    config::Config,
    db,
    error::AppError,
    models::User,
};

/// Paths under the protected scope that are reachable without a token.
const PUBLIC_PATHS: [&str; 2] = ["/api/auth/token", "/api/auth/register"];

fn is_public(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    PUBLIC_PATHS.contains(&path)
}

/// Authenticates every request of the wrapped scope.
///
/// The bearer token is verified with the `Config` registered as app data and
/// its subject is loaded from the `PgPool`; the resulting `User` is stored in
/// the request extensions for the `AuthenticatedUser` extractor. Rejected
/// requests are answered here with the `AppError` response, so the wrapped
/// service never runs for them.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if !is_public(req.path()) {
                match current_user(&req).await {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                    }
                    Err(err) => {
                        log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                        let response = err.error_response();
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

async fn current_user(req: &ServiceRequest) -> Result<User, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    let config = req
        .app_data::<web::Data<Config>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Config is not registered".into()))?;
    let claims = verify_token(token, &config.jwt)?;

    let pool = req
        .app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Database pool is not registered".into()))?;

    match db::users::find_by_username(pool.get_ref(), &claims.sub).await? {
        Some(user) if user.is_active => Ok(user),
        Some(_) => Err(AppError::Unauthorized("Inactive user".into())),
        None => Err(AppError::Unauthorized(
            "Could not validate credentials".into(),
        )),
    }
}
