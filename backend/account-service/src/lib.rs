// Account Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use error::{ApiError, ApiResult};

// Re-export commonly used types
pub use models::account::{Account, Role};

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub settings: Arc<config::Settings>,
    pub auth: services::auth::AuthService,
    pub otp: services::otp::OtpService,
    pub reset: services::reset::ResetService,
    pub directory: services::directory::DirectoryService,
}

impl AppState {
    /// Wire the service graph from a pool and loaded settings.
    pub fn new(db: sqlx::PgPool, settings: config::Settings) -> ApiResult<Self> {
        let email = services::email::EmailService::new(&settings.email)?;
        let otp = services::otp::OtpService::new(db.clone(), email.clone());
        let auth = services::auth::AuthService::new(
            db.clone(),
            otp.clone(),
            settings.jwt_secret.clone(),
        );
        let reset = services::reset::ResetService::new(db.clone(), email);
        let directory = services::directory::DirectoryService::new(db.clone());

        Ok(AppState {
            db,
            settings: Arc::new(settings),
            auth,
            otp,
            reset,
            directory,
        })
    }
}
