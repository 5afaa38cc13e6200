use std::env;
use std::time::Duration;

// Configuration for the typing-test API server
#[derive(Clone, Debug)]
pub struct Config {
    pub db_url: Option<String>, // Database connection URL, in-memory store when absent
    pub db_max_connections: u32, // Size of the Postgres connection pool
    pub bind_addr: String, // Address for main HTTP server
    pub metrics_port: u16, // Port for Prometheus metrics server
    pub word_count: usize, // Number of words in an issued word set
    pub word_min_length: usize, // Shortest word allowed in a word set
    pub word_max_length: usize, // Longest word allowed in a word set
    pub word_join: String, // Delimiter used when a word set is rendered as a single string
    pub word_cache_ttl: Duration, // How long an issued word set can be resumed
    pub word_cache_capacity: usize, // Maximum number of cached word sets
    pub leaderboard_max_page: i32, // Upper bound applied to leaderboard page sizes
    pub seed_sessions: Vec<(String, String)>, // Session token and account pairs for the in-memory store
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_url: None,
            db_max_connections: 10,
            bind_addr: "0.0.0.0:8080".to_string(),
            metrics_port: 9090,
            word_count: 250,
            word_min_length: 3,
            word_max_length: 8,
            word_join: "|".to_string(),
            word_cache_ttl: Duration::from_secs(3600),
            word_cache_capacity: 10_000,
            leaderboard_max_page: 100,
            seed_sessions: Vec::new(),
        }
    }
}

impl Config {
    // Loads configuration from environment variables, with defaults for optional fields
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
        Self::from_vars(|key| env::var(key).ok())
    }

    // Builds the configuration from any variable source
    pub fn from_vars<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let parsed = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            // Optional: Database connection URL
            db_url: parsed("DATABASE_URL"),
            // Optional: Pool size (defaults to 10)
            db_max_connections: parsed("DB_MAX_CONNECTIONS").and_then(|v| v.parse().ok()).unwrap_or(defaults.db_max_connections),
            // Optional: Main server bind address (defaults to 0.0.0.0:8080)
            bind_addr: parsed("BIND_ADDR").unwrap_or(defaults.bind_addr),
            // Optional: Metrics server port (defaults to 9090)
            metrics_port: parsed("METRICS_PORT").and_then(|v| v.parse().ok()).unwrap_or(defaults.metrics_port),
            // Optional: Words per set (defaults to 250)
            word_count: parsed("WORD_COUNT").and_then(|v| v.parse().ok()).unwrap_or(defaults.word_count),
            // Optional: Word length bounds (default to 3..=8)
            word_min_length: parsed("WORD_MIN_LENGTH").and_then(|v| v.parse().ok()).unwrap_or(defaults.word_min_length),
            word_max_length: parsed("WORD_MAX_LENGTH").and_then(|v| v.parse().ok()).unwrap_or(defaults.word_max_length),
            // Optional: Join delimiter (defaults to "|"), kept verbatim so a space is allowed
            word_join: lookup("WORD_JOIN").filter(|v| !v.is_empty()).unwrap_or(defaults.word_join),
            // Optional: Cache lifetime in seconds (defaults to one hour)
            word_cache_ttl: parsed("WORD_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.word_cache_ttl),
            // Optional: Cache capacity (defaults to 10000)
            word_cache_capacity: parsed("WORD_CACHE_CAPACITY").and_then(|v| v.parse().ok()).unwrap_or(defaults.word_cache_capacity),
            // Optional: Leaderboard page cap (defaults to 100)
            leaderboard_max_page: parsed("LEADERBOARD_MAX_PAGE").and_then(|v| v.parse().ok()).unwrap_or(defaults.leaderboard_max_page),
            // Optional: Sessions for the in-memory store (format: token:account;token:account)
            seed_sessions: parsed("SEED_SESSIONS").map(|v| parse_sessions(&v)).unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    // Rejects settings that would make an operation impossible to serve
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        if self.word_count == 0 {
            return Err("WORD_COUNT must be at least 1".into());
        }
        if self.word_min_length == 0 || self.word_min_length > self.word_max_length {
            return Err("WORD_MIN_LENGTH must be at least 1 and not exceed WORD_MAX_LENGTH".into());
        }
        if self.leaderboard_max_page < 1 {
            return Err("LEADERBOARD_MAX_PAGE must be at least 1".into());
        }
        if self.word_cache_capacity == 0 {
            return Err("WORD_CACHE_CAPACITY must be at least 1".into());
        }
        Ok(())
    }
}

// Parses `token:account;token:account` pairs, skipping malformed entries
fn parse_sessions(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
                Some((parts[0].to_string(), parts[1].to_string()))
            } else {
                None
            }
        })
        .collect()
}
