use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use projectpro::{auth::AuthMiddleware, config::Config, db, routes};
use std::io;

const LOCAL_FRONTEND: &str = "http://localhost:3000";

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = db::connect(&config)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    db::migrate(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let bind_address = (config.server_host.clone(), config.server_port);
    log::info!("Starting ProjectPro server at {}", config.server_url());

    let config = web::Data::new(config);
    let pool = web::Data::new(pool);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.frontend_url)
            .allowed_origin(LOCAL_FRONTEND)
            .allow_any_method()
            .allow_any_header()
            .expose_headers([header::WWW_AUTHENTICATE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(pool.clone())
            .app_data(config.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::health::index)
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
