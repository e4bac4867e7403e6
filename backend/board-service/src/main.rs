/// Board Service Main Entry Point
///
/// Starts the HTTP server with:
/// - PostgreSQL connection pool
/// - Database migrations on boot
/// - Server-side session store for cookie authentication
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_service::db::{create_pool, run_migrations};
use board_service::routes::configure_routes;
use board_service::services::SessionStore;
use board_service::Config;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting board-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Create database connection pool
    let db_pool = create_pool(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    // Verify database connection
    sqlx::query("SELECT 1")
        .execute(&db_pool)
        .await
        .context("Failed to verify database connection")?;
    tracing::info!(
        "Database pool created and verified with {} max connections",
        config.database.max_connections
    );

    // Run migrations
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    let session_store = SessionStore::new(
        db_pool.clone(),
        config.session.ttl_secs,
        config.session.cookie_name.clone(),
    );

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server on {}", bind_address);

    let server_config = config.clone();

    HttpServer::new(move || {
        // Build CORS configuration from allowed_origins
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
                any_origin = true;
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);
        // The auth cookie only travels cross-origin when origins are explicit
        if !any_origin {
            cors = cors.supports_credentials();
        }

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(session_store.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    // The server runs until Ctrl+C or SIGTERM stops it gracefully.
    .bind(&bind_address)
    .context("Failed to bind HTTP server")?
    .workers(4)
    .run()
    .await?;

    tracing::info!("Board service shutdown complete");

    Ok(())
}
