use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{anyhow, Context};
use blog_service::config::{Config, StorageBackend};
use blog_service::db::{create_pool, BlogRepository, MemoryRepository, PgRepository, MIGRATOR};
use blog_service::middleware::SessionMiddleware;
use blog_service::telemetry::{self, LogFormat};
use blog_service::{routes, AppState};
use std::sync::Arc;

/// Probe the local `/health` endpoint; used as the container healthcheck.
async fn run_healthcheck() -> anyhow::Result<()> {
    let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8000".to_string());
    let url = format!("http://127.0.0.1:{}/health", port);

    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .with_context(|| format!("healthcheck request to {} failed", url))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(anyhow!("healthcheck HTTP status: {}", resp.status()))
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn BlogRepository>> {
    match config.app.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database)
                .await
                .context("failed to create database pool")?;
            MIGRATOR
                .run(&pool)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("Database migrations applied");
            Ok(Arc::new(PgRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}

/// Blog Service
///
/// Serves the blogging site: accounts and sessions under `/accounts/`, posts
/// under `/post/`, replies under `/reply/`, likes under `/like/` and the home
/// listing at `/`.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        return run_healthcheck().await;
    }

    dotenvy::dotenv().ok();
    telemetry::init(LogFormat::from_env());

    let config = Config::from_env().map_err(|e| anyhow!("failed to load configuration: {}", e))?;

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(env = %config.app.env, storage = ?config.app.storage, "Configuration loaded");

    let repo = build_repository(&config).await?;
    let state = web::Data::new(AppState::new(repo, config.session.clone()));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SessionMiddleware)
            .wrap(build_cors(&allowed_origins))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("blog-service shut down");
    Ok(())
}
