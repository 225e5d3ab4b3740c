use std::sync::Arc;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use contact_backend::{
    background_task::start_sweep_task,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    repositories::{relay::RelaySubmissionRepo, sqlx_repo::SqlxSubmissionRepo},
    routes::configure_routes,
    security::cors::build_cors,
    settings::{AppConfig, DeliveryMode},
    telemetry::init_tracing,
    AppState, SharedSubmissionRepo,
};
use tracing_actix_web::TracingLogger;

async fn build_repository(config: &AppConfig) -> anyhow::Result<SharedSubmissionRepo> {
    match config.delivery_mode {
        DeliveryMode::Database => {
            let pool = create_pool(&config.database_url)
                .await
                .context("Failed to create database connection pool")?;

            if config.run_migrations {
                run_migrations(&pool).await.context("Failed to run database migrations")?;
            }

            Ok(Arc::new(SqlxSubmissionRepo::new(pool)))
        }
        DeliveryMode::Relay => {
            let repo = RelaySubmissionRepo::new(
                config.relay_url.clone(),
                &config.relay_access_key,
                config.persistence_timeout(),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build relay client: {}", e))?;

            Ok(Arc::new(repo))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let submission_repo = build_repository(&config).await?;
    let app_state = web::Data::new(AppState::new(&config, submission_repo));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "Starting Contact API v{} on {} ({:?} delivery)",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.delivery_mode
    );

    let server_state = app_state.clone();
    let server_config = config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&server_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    tokio::spawn(start_sweep_task(
        app_state,
        std::time::Duration::from_secs(config.rate_limit_sweep_interval_secs.max(1)),
    ));

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => {},
    }

    tracing::info!("Contact API stopped");
    Ok(())
}
