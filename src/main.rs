//! DevLink - GraphQL API server for the developer network

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devlink::{
    auth::cookies::CookieSettings,
    auth::jwt::TokenService,
    config::Args,
    db::MongoClient,
    graphql,
    mail::{Mailer, NoopMailer, SmtpMailer},
    server,
    store::Stores,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("devlink={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  DevLink - developer network API");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!(
        "Mode: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
    );
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Allowed origin: {}", args.allowed_origin);
    info!("App URL: {}", args.app_url);
    info!(
        "Session TTL: {}s, reset TTL: {}s",
        args.session_ttl_seconds, args.reset_ttl_seconds
    );
    info!("======================================");

    // Connect to MongoDB
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            info!("MongoDB connected successfully");
            client
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    // Build stores (creates collections and applies unique indexes)
    let stores = match Stores::init(&mongo).await {
        Ok(stores) => Arc::new(stores),
        Err(e) => {
            error!("Failed to initialize collections: {}", e);
            std::process::exit(1);
        }
    };

    let tokens = Arc::new(TokenService::new(
        args.jwt_secret(),
        args.session_ttl_seconds,
        args.reset_ttl_seconds,
    ));

    // Mail transport: SMTP when configured, a logging noop otherwise (dev)
    let mailer: Arc<dyn Mailer> = if args.smtp_configured() {
        let smtp = SmtpMailer::new(
            args.smtp_host.as_deref().unwrap_or_default(),
            args.smtp_port,
            args.smtp_user.as_deref().unwrap_or_default(),
            args.smtp_password.as_deref().unwrap_or_default(),
            args.mail_from.clone(),
        )?;
        info!(
            "SMTP mailer configured (relay: {}:{})",
            args.smtp_host.as_deref().unwrap_or_default(),
            args.smtp_port
        );
        Arc::new(smtp)
    } else {
        warn!("SMTP not configured - reset links will be logged, not sent");
        Arc::new(NoopMailer)
    };

    let schema = graphql::build_schema(
        Arc::clone(&stores),
        Arc::clone(&tokens),
        mailer,
        CookieSettings {
            domain: args.cookie_domain.clone(),
        },
        args.app_url.clone(),
    );

    let state = Arc::new(server::AppState {
        args,
        schema,
        tokens,
    });

    // Run the server
    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
