//! Configuration for DevLink
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;

/// DevLink - GraphQL API server for the developer network
#[derive(Parser, Debug, Clone)]
#[command(name = "devlink")]
#[command(about = "GraphQL API server for the DevLink developer network")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "devlink")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// Session token expiry in seconds (sliding, reissued on each authenticated query)
    #[arg(long, env = "SESSION_TTL_SECONDS", default_value = "1800")]
    pub session_ttl_seconds: u64,

    /// Password-reset token expiry in seconds
    #[arg(long, env = "RESET_TTL_SECONDS", default_value = "600")]
    pub reset_ttl_seconds: u64,

    /// Cookie domain for the token/checkToken pair (optional)
    #[arg(long, env = "COOKIE_DOMAIN")]
    pub cookie_domain: Option<String>,

    /// Allowed CORS origin for the browser client
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,

    /// Public base URL of the front end, used to compose reset links
    #[arg(long, env = "APP_URL", default_value = "http://localhost:3000")]
    pub app_url: String,

    /// SMTP relay host for password-reset mail
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USER")]
    pub smtp_user: Option<String>,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD")]
    pub smtp_password: Option<String>,

    /// From address for outbound mail
    #[arg(long, env = "MAIL_FROM", default_value = "DevLink <no-reply@devlink.example>")]
    pub mail_from: String,

    /// Enable development mode (insecure JWT fallback, noop mailer without SMTP)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Get effective JWT secret (uses default in dev mode)
    pub fn jwt_secret(&self) -> String {
        if self.dev_mode {
            self.jwt_secret
                .clone()
                .unwrap_or_else(|| "dev-only-insecure-secret".to_string())
        } else {
            self.jwt_secret
                .clone()
                .expect("JWT_SECRET is required in production mode")
        }
    }

    /// Whether SMTP is fully configured
    pub fn smtp_configured(&self) -> bool {
        self.smtp_host.is_some() && self.smtp_user.is_some() && self.smtp_password.is_some()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            if self.jwt_secret.is_none() {
                return Err("JWT_SECRET is required in production mode".to_string());
            }
            if !self.smtp_configured() {
                return Err(
                    "SMTP_HOST, SMTP_USER and SMTP_PASSWORD are required in production mode"
                        .to_string(),
                );
            }
        }

        if self.session_ttl_seconds == 0 || self.reset_ttl_seconds == 0 {
            return Err("token TTLs must be greater than zero".to_string());
        }

        Ok(())
    }
}
