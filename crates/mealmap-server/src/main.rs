mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mealmap_places::GeoapifyClient;
use mealmap_scraper::{
    ChromiumBrowser, Enricher, FileCache, OpenRiceScraper, RestaurantScraper, UnavailableScraper,
};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mealmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(?config, "starting mealmap server");

    let places = GeoapifyClient::new(
        &config.geoapify_base_url,
        &config.geoapify_api_key,
        config.places_timeout_secs,
    )?;

    // Enrichment is best-effort: if the browser engine cannot start, the
    // server still serves restaurant search and geocoding.
    let scraper: Arc<dyn RestaurantScraper> =
        match ChromiumBrowser::launch(config.scraper_headless, config.scraper_page_timeout_ms)
            .await
        {
            Ok(engine) => Arc::new(OpenRiceScraper::new(
                engine,
                &config.openrice_base_url,
                config.scraper_max_retries,
                config.scraper_inter_request_delay_ms,
            )),
            Err(e) => {
                tracing::error!(error = %e, "browser engine unavailable; enrichment lookups will return unmatched");
                Arc::new(UnavailableScraper)
            }
        };

    let cache = FileCache::new(&config.cache_dir, config.cache_retention_hours);
    let enricher = Enricher::new(cache, scraper, config.scraper_max_concurrent);

    let state = AppState {
        places,
        enricher,
        scraper_page_timeout_ms: config.scraper_page_timeout_ms,
        scraper_max_retries: config.scraper_max_retries,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
