//! Application assembly and lifecycle.

use crate::cache::http::HttpCache;
use crate::cache::recipe::RecipeCache;
use crate::cache::writeback::Writeback;
use crate::config::Config;
use crate::data::{PgHttpCacheStore, PgRecipeStore};
use crate::spoonacular::transport::ReqwestTransport;
use crate::spoonacular::{RecipeQueries, SpoonacularApi};
use crate::state::AppState;
use crate::web::create_router;
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// How often the expiry sweeper wakes up.
const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Main application struct containing all necessary components.
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Create a new App instance with all components initialized: the
    /// database pool (connected once, reused for the process lifetime),
    /// migrations, the write-back worker, both caches, and the API client.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let db_pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(4))
            .idle_timeout(Duration::from_secs(60 * 2))
            .max_lifetime(Duration::from_secs(60 * 30))
            .connect(&config.database_url)
            .await
            .context("Failed to create database pool")?;

        info!(
            min_connections = 0,
            max_connections = 4,
            acquire_timeout = "4s",
            idle_timeout = "2m",
            max_lifetime = "30m",
            "database pool established"
        );

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("database migrations completed");

        let writeback = Writeback::start();

        let recipe_cache = RecipeCache::new(
            Arc::new(PgRecipeStore::new(db_pool.clone(), config.cache_max_age())),
            writeback.clone(),
        );
        let http_cache = HttpCache::new(
            Arc::new(PgHttpCacheStore::new(db_pool.clone())),
            writeback.clone(),
        );

        let base_url = Url::parse(&config.spoonacular_base_url)
            .context("Failed to parse SPOONACULAR_BASE_URL")?;
        let transport = Arc::new(
            ReqwestTransport::new(config.request_timeout())
                .context("Failed to create HTTP transport")?,
        );
        let api = Arc::new(SpoonacularApi::new(
            base_url,
            config.spoonacular_api_key.clone(),
            transport,
            http_cache,
            config.cache_max_age(),
        ));
        let recipes = RecipeQueries::new(api, recipe_cache);

        let app_state = AppState::new(db_pool, recipes, writeback);
        app_state.spawn_cache_sweeper(SWEEP_INTERVAL, config.cache_max_age());

        Ok(App { config, app_state })
    }

    /// Serve the web API until a shutdown signal arrives, then flush any
    /// cache writes still queued.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let router = create_router(self.app_state.clone());
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", self.config.port))
            .await
            .with_context(|| format!("Failed to bind port {}", self.config.port))?;
        info!(port = self.config.port, "web server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Web server error")?;

        info!("flushing pending cache writes");
        self.app_state.writeback.flush().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
