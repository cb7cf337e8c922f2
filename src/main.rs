use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod repository;
mod routes;
mod service;
mod utils;

use config::Config;
use repository::{MemoryRepository, MySqlRepository};
use service::AppState;
use service::clock::SystemClock;

use crate::docs::ApiDoc;
use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, prefix = %config.api_prefix, "Server starting...");

    let clock = Arc::new(SystemClock);
    let state = match &config.database_url {
        Some(url) => {
            let pool = db::init_db(url, config.db_max_connections)
                .await
                .context("failed to connect to the database")?;
            AppState::new(Arc::new(MySqlRepository::new(pool)), clock, config.max_page_size)
        }
        None => {
            warn!("DATABASE_URL not set, records are kept in memory only");
            AppState::new(Arc::new(MemoryRepository::new()), clock, config.max_page_size)
        }
    };

    if config.seed_demo_data {
        db::seed_demo_data(&state)
            .await
            .context("failed to seed demo data")?;
    }

    let state = Data::new(state);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} to match JS/CSS files
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
