// Shared setup for the API integration tests: an in-memory store with two
// accounts, the schema built on top of it and small request helpers.

#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Response, Value};
use typvp::cache::WordSetCache;
use typvp::database::{MemoryStore, Store};
use typvp::{build_schema, ApiSchema, Config, Identity};

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<WordSetCache>,
    pub schema: ApiSchema,
}

pub fn setup() -> TestContext {
    setup_with(Config::default())
}

pub fn setup_with(config: Config) -> TestContext {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(
        MemoryStore::new()
            .with_session("alice-token", "alice")
            .with_session("bob-token", "bob"),
    );
    let cache = Arc::new(WordSetCache::new(config.word_cache_ttl, config.word_cache_capacity));
    let dyn_store: Arc<dyn Store> = store.clone();
    let schema = build_schema(dyn_store, cache.clone(), &config).expect("schema builds");

    TestContext { store, cache, schema }
}

pub fn alice() -> Identity {
    Identity::Account("alice".to_string())
}

pub fn bob() -> Identity {
    Identity::Account("bob".to_string())
}

impl TestContext {
    pub async fn execute(&self, query: &str, identity: Identity) -> Response {
        self.schema.execute(Request::new(query).data(identity)).await
    }

    pub async fn data(&self, query: &str, identity: Identity) -> serde_json::Value {
        let response = self.execute(query, identity).await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().expect("data is valid JSON")
    }
}

pub fn error_code(response: &Response) -> Option<Value> {
    response
        .errors
        .first()
        .and_then(|error| error.extensions.as_ref())
        .and_then(|extensions| extensions.get("code"))
        .cloned()
}

pub fn add_result_mutation(wpm: f64) -> String {
    format!(
        "mutation {{ addNewResult(result: {{cpm: {}, rawCpm: {}, wpm: {}, correct: 50, incorrect: 1, corrections: 0}}) }}",
        wpm * 5.0,
        wpm * 5.0 + 10.0,
        wpm
    )
}
