#![doc = "The `projectpro` library crate."]
#![doc = ""]
#![doc = "Domain models, persistence queries, authentication, routing configuration and"]
#![doc = "error handling for the ProjectPro API. The binary (`main.rs`) builds the"]
#![doc = "`App` from these pieces and runs the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
