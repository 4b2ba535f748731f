use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use roomie_algo::config::{Settings, StorageBackend};
use roomie_algo::models::Profile;
use roomie_algo::routes::{self, AppState};
use roomie_algo::services::{InMemoryStore, PostgresStore, ProfileStore, RecommendationService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn load_seed(path: &str) -> std::io::Result<Vec<Profile>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn ProfileStore>> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            let profiles = match &settings.storage.seed_path {
                Some(path) => load_seed(path).map_err(|e| {
                    error!("Failed to load seed profiles from {}: {}", path, e);
                    e
                })?,
                None => Vec::new(),
            };
            info!("In-memory store initialized with {} profiles", profiles.len());
            Ok(Arc::new(InMemoryStore::with_profiles(profiles)))
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let store = PostgresStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;
            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Roomie Algo recommendation service...");

    let matcher = settings.build_matcher().map_err(|e| {
        error!("Invalid matching configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!(
        "Matcher initialized: weights {:?}, centroid threshold {}",
        matcher.vectorizer().weights(),
        matcher.options().centroid_threshold
    );

    let store = build_store(&settings).await?;

    let app_state = AppState {
        service: Arc::new(RecommendationService::new(store, matcher)),
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
            .configure(routes::extractor_configs)
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
