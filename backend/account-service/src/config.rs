/// Configuration management, loaded from environment variables once at
/// startup. Missing required values abort the boot with context.
use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database_url: String,
    pub jwt_secret: String,
    pub email: EmailSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            server: ServerSettings::from_env()?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            email: EmailSettings::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// SMTP settings. An empty `smtp_host` switches the mail gateway into
/// no-op mode: sends are logged and dropped instead of attempted.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub use_starttls: bool,
    pub reset_base_url: String,
}

impl EmailSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "noreply@shopfront.dev".to_string()),
            use_starttls: env::var("SMTP_USE_STARTTLS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            reset_base_url: env::var("RESET_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_settings_from_env() {
        env::set_var("DATABASE_URL", "postgres://localhost/accounts_test");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("SERVER_PORT", "9000");

        let settings = Settings::from_env().unwrap();

        assert_eq!(settings.database_url, "postgres://localhost/accounts_test");
        assert_eq!(settings.jwt_secret, "test-secret");
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9000);

        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("SERVER_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_jwt_secret_rejected() {
        env::set_var("DATABASE_URL", "postgres://localhost/accounts_test");
        env::remove_var("JWT_SECRET");

        assert!(Settings::from_env().is_err());

        env::remove_var("DATABASE_URL");
    }

    #[test]
    #[serial_test::serial]
    fn test_email_defaults() {
        env::remove_var("SMTP_HOST");
        env::remove_var("SMTP_PORT");
        env::remove_var("SMTP_USE_STARTTLS");

        let email = EmailSettings::from_env().unwrap();

        assert!(email.smtp_host.is_empty());
        assert_eq!(email.smtp_port, 587);
        assert!(email.use_starttls);
        assert_eq!(email.smtp_from, "noreply@shopfront.dev");
        assert_eq!(email.reset_base_url, "http://localhost:3000");
    }
}
