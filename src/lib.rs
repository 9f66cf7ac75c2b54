pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::media::MediaHost;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub media: Arc<dyn MediaHost>,
}

impl AppState {
    /// State with the media host chosen from the configuration.
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        let media = services::media::from_config(&config);
        Self { db, config, media }
    }
}
