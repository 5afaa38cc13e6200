use actix_web::{web, App, HttpServer};
use backoff::{future::retry, ExponentialBackoff};
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use typvp::database::{schema::init_db, MemoryStore, PgStore, Store};
use typvp::{graphql, metrics, rest, AppState, Config};

// Interval between sweeps of expired cached word sets
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

// Connects to Postgres (retrying while the database comes up) or falls back to the in-memory store
async fn open_store(config: &Config) -> Result<Arc<dyn Store>, Box<dyn std::error::Error + Send + Sync>> {
    let Some(db_url) = config.db_url.as_deref() else {
        warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
        let store = config
            .seed_sessions
            .iter()
            .fold(MemoryStore::new(), |store, (token, account)| store.with_session(token, account));
        return Ok(Arc::new(store));
    };

    // Retry the initial connection for up to five minutes
    let backoff = ExponentialBackoff {
        max_elapsed_time: Some(Duration::from_secs(300)),
        ..Default::default()
    };
    let max_connections = config.db_max_connections;
    let pool = retry(backoff, || async move {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await
            .map_err(|e| {
                warn!("Database not reachable yet: {}", e);
                backoff::Error::transient(e)
            })
    })
    .await?;

    init_db(&pool).await?;
    info!("Connected to database with {} max connections", config.db_max_connections);
    Ok(Arc::new(PgStore::new(pool)))
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env if present, then initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let store = open_store(&config).await?;
    let state = AppState::new(store, &config)?;

    // Sweep expired word sets in the background
    let cache = state.cache.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            cache.purge_expired();
        }
    });

    // Serve Prometheus metrics on their own port
    let metrics_server = HttpServer::new(|| App::new().route("/metrics", web::get().to(metrics::metrics)))
        .bind(("0.0.0.0", config.metrics_port))?
        .run();
    actix_web::rt::spawn(metrics_server);
    info!("Metrics available on port {}", config.metrics_port);

    // Start the GraphQL and REST server
    info!("Listening on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(graphql::graphql)
            .service(graphql::graphiql)
            .service(rest::get_leaderboard)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
