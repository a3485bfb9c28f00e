use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use common::store::RecordStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use auth::{AdminCredentials, AdminGuard};
use config::{Cli, Config};
use routes::AppState;
use security::{configure_cors, SubmissionLimiter};

mod admin;
mod auth;
mod config;
mod error;
mod form;
mod routes;
mod security;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.apply_cli(cli);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting the intake service");

    let store = RecordStore::open(&config.data_file).await?;
    info!(path = %store.path().display(), "Using storage document");

    tokio::fs::create_dir_all(&config.static_dir)
        .await
        .with_context(|| format!("failed to create {}", config.static_dir.display()))?;

    if config.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set, the admin panel is reachable without credentials");
    }

    let app_state = web::Data::new(AppState {
        store,
        landing_page: config.landing_page.clone(),
        export_file_name: config.export_file_name(),
    });
    let limiter = SubmissionLimiter::new(config.submit_rate_limit);

    let address = config.server_address();
    info!("Starting HTTP server on {}", address);
    HttpServer::new(move || {
        let guard = match &config.admin_password {
            Some(password) => {
                AdminGuard::new(AdminCredentials::new(&config.admin_user, password))
            }
            None => AdminGuard::open(),
        };
        let limiter = limiter.clone();

        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .wrap(configure_cors(&config.allowed_origins))
            .configure(|cfg| routes::configure(cfg, guard, limiter))
            .service(Files::new("/static", &config.static_dir))
    })
    .bind(&address)?
    .run()
    .await?;

    Ok(())
}
