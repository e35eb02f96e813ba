use actix_web::{middleware as actix_middleware, App, HttpServer};
use std::sync::Arc;

use work_atlas::{
    app::{self, AppState},
    auth_token::{AuthTokenService, SESSION_TTL},
    config::{AppConfig, StoreBackend},
    db::{InMemoryStore, JobBoardStore, MongoDbContext},
    error::JobBoardError,
};

fn fail_startup(what: &str, err: impl std::fmt::Display) -> ! {
    log::error!("{}: {}", what, err);
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting Work Atlas...");

    let config =
        AppConfig::from_env().unwrap_or_else(|e| fail_startup("Failed to load configuration", e));

    let auth_tokens = AuthTokenService::from_secret(config.token_secret.as_deref(), SESSION_TTL)
        .unwrap_or_else(|e| fail_startup("Failed to initialise session tokens", e));

    let store: Arc<dyn JobBoardStore> = match config.backend {
        StoreBackend::Mongo => {
            log::info!("Connecting to MongoDB database '{}'...", config.database_name);
            let context = MongoDbContext::connect(&config)
                .await
                .unwrap_or_else(|e| fail_startup("Failed to configure MongoDB client", e));
            if let Err(e) = context.ping().await {
                fail_startup("Failed to connect to MongoDB", e);
            }
            log::info!("Connected to MongoDB");
            Arc::new(context)
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory store; data is lost on shutdown");
            Arc::new(InMemoryStore::new())
        }
    };

    let cookie_policy = config.cookie_policy();
    log::info!(
        "Session cookie policy: secure={} same_site={:?}",
        cookie_policy.secure,
        cookie_policy.same_site
    );

    let state = AppState::new(store.clone(), auth_tokens, cookie_policy);
    let cors_origins = config.cors_origins.clone();

    let server = app::bind_listener(&config.host, config.port).and_then(|listener| {
        HttpServer::new(move || {
            App::new()
                .wrap(actix_middleware::Logger::default())
                .wrap(app::cors(&cors_origins))
                .configure(|cfg| state.configure(cfg))
        })
        .listen(listener)
        .map_err(|e| JobBoardError::Config(format!("cannot listen: {}", e)))
    });

    let server = match server {
        Ok(server) => server,
        Err(e) => {
            store.close().await;
            fail_startup("Failed to start HTTP server", e);
        }
    };

    log::info!("Work Atlas is running on {}:{}", config.host, config.port);
    let http_result = server.run().await;

    store.close().await;
    log::info!("Work Atlas stopped");

    http_result
}
