// GraphQL module for defining the application state and GraphQL schema
pub mod schema;
pub mod routes;
pub mod extensions;

// Re-export key types for external use
pub use schema::{MutationRoot, QueryRoot};
pub use routes::{graphql, graphiql};
pub use extensions::AccessLog;
use async_graphql::{EmptySubscription, Schema};
use std::sync::Arc;
use super::cache::WordSetCache;
use super::config::Config;
use super::database::Store;
use super::words::{WordGenOptions, WordGenerator};

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

// Builds the schema with the store, word generator, cache and settings injected as context data
pub fn build_schema(
    store: Arc<dyn Store>,
    cache: Arc<WordSetCache>,
    config: &Config,
) -> Result<ApiSchema, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let generator = WordGenerator::new(WordGenOptions {
        count: config.word_count,
        min_length: config.word_min_length,
        max_length: config.word_max_length,
    })?;

    Ok(Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(cache)
        .data(generator)
        .data(config.clone())
        .extension(AccessLog)
        .finish())
}

// Application state shared across GraphQL and REST handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>, // Data access layer, Postgres or in-memory
    pub cache: Arc<WordSetCache>, // Last issued word set per account
    pub config: Config, // Settings used by the REST mirror
    pub schema: ApiSchema, // GraphQL schema instance
}

impl AppState {
    // Initializes the application state with the store and GraphQL configuration
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let cache = Arc::new(WordSetCache::new(config.word_cache_ttl, config.word_cache_capacity));
        let schema = build_schema(store.clone(), cache.clone(), config)?;

        Ok(AppState {
            store,
            cache,
            config: config.clone(),
            schema,
        })
    }
}
