use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mskn_relay::config::{Settings, UpstreamStrategy};
use mskn_relay::core::NeighborhoodPriceTable;
use mskn_relay::routes::{self, AppState};
use mskn_relay::services;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.logging.level))
        .with_target(false)
        .with_level(true);

    if settings.logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting mskn recommendation relay...");
    info!("Configuration loaded successfully");

    // Neighborhood prices are loaded once and shared read-only
    let prices = match &settings.relay.price_table_path {
        Some(path) => NeighborhoodPriceTable::from_json_file(path).map_err(|e| {
            error!("Failed to load price table from {}: {}", path, e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?,
        None => NeighborhoodPriceTable::riyadh(),
    };

    info!("Neighborhood price table loaded ({} entries)", prices.len());

    let source = services::build_source(&settings, Arc::new(prices)).map_err(|e| {
        error!("Failed to initialize upstream client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if settings.upstream.strategy == UpstreamStrategy::Completion && settings.completion.api_key().is_none() {
        warn!("HUGGINGFACE_API_KEY is not set - completion requests will fail until it is configured");
    }

    info!(
        "Upstream: {} (test mode: {}, timeout: {}s)",
        source.name(),
        settings.relay.test_mode,
        settings.upstream.timeout_secs
    );

    // Build application state
    let app_state = AppState {
        source,
        test_mode: settings.relay.test_mode,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);
    info!("AI endpoint available at http://{}:{}/api/ai/ask", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
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
