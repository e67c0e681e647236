use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware, error};
use scheme_match::config::Settings;
use scheme_match::core::{AlertGenerator, Matcher};
use scheme_match::error::SchemeError;
use scheme_match::routes::{self, AppState};
use scheme_match::services::{CatalogCache, CsvCatalogLoader};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    SchemeError::Input(format!("Invalid JSON: {}", err)).into()
}

/// Handle path extraction errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    SchemeError::Input(format!("Invalid path: {}", err)).into()
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    error!("Invalid configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the logging section applies
    let settings = Settings::load().map_err(config_error)?;

    // Initialize logging; LOG_LEVEL and LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting scheme matching service...");

    let weights = settings.scoring_weights().map_err(config_error)?;

    info!("Configuration loaded successfully");

    let matcher = Matcher::new(weights, settings.matching.min_score);
    let alerts = AlertGenerator::new(weights, settings.alert_settings());

    info!(
        "Matcher initialized with weights: {:?}, min score {}",
        weights,
        settings.matching.min_score
    );

    let catalog = Arc::new(CatalogCache::new(
        Arc::new(CsvCatalogLoader::new()),
        settings.catalog.cache_ttl_secs,
    ));

    // Warm the cache; the service still starts if the file is missing
    match catalog.get(&settings.catalog.path).await {
        Ok(loaded) => info!("Catalog loaded: {} schemes from {}", loaded.len(), loaded.source()),
        Err(e) => warn!("Catalog not available at startup ({}), will retry on first request", e),
    }

    let app_state = AppState {
        catalog,
        catalog_path: settings.catalog.path.clone(),
        matcher,
        alerts,
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
