pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod graphql;
pub mod metrics;
pub mod models;
pub mod operations;
pub mod rest;
pub mod utils;
pub mod words;

pub use auth::Identity;
pub use config::Config;
pub use errors::{ServiceError, StoreError};
pub use graphql::{build_schema, ApiSchema, AppState};
pub use models::{Account, NewTest, Pagination, Test, TestType};
