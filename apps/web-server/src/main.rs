//! # Shutter Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use migration::{Migrator, MigratorTrait};
use tracing_actix_web::TracingLogger;

mod config;
mod cookies;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;
mod views;

use config::AppConfig;
use observability::CorrelationIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Shutter web server on {}:{}",
        config.host,
        config.port
    );

    let db = shutter_infra::database::connect(&config.database)
        .await
        .map_err(std::io::Error::other)?;
    Migrator::up(&db, None)
        .await
        .map_err(std::io::Error::other)?;
    tracing::info!("Database migrations applied");

    cookies::set_secure(config.cookie_secure);
    let state = AppState::new(db, config.session.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(CorrelationIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
