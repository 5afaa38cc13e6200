// Error types shared by the store, the operations and the GraphQL layer.
//
// Store failures keep their detail for the logs; what reaches a GraphQL client
// is a message plus a stable `code` extension from [`codes`].

use async_graphql::ErrorExtensions;
use thiserror::Error;

// Failures raised by a [`crate::database::Store`] implementation
#[derive(Debug, Error)]
pub enum StoreError {
    // Query or connection failure reported by Postgres
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // The referenced account does not exist
    #[error("Account {0} not found")]
    AccountNotFound(String),

    // The backend refused to serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// Failures surfaced by the application operations
#[derive(Debug, Error)]
pub enum ServiceError {
    // Malformed or out-of-range input
    #[error("Invalid input: {0}")]
    Validation(String),

    // Invalid `skip`/`first` pair
    #[error("Invalid pagination: {0}")]
    Pagination(String),

    // The operation needs an authenticated caller
    #[error("Not authenticated")]
    NotAuthenticated,

    // Create, update or lookup against the store failed
    #[error("Storage failure")]
    Storage(#[from] StoreError),
}

// Error codes placed in the `extensions.code` field of GraphQL errors
pub mod codes {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INVALID_PAGINATION: &str = "INVALID_PAGINATION";
    pub const NOT_AUTHENTICATED: &str = "NOT_AUTHENTICATED";
    pub const STORAGE_FAILURE: &str = "STORAGE_FAILURE";
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => codes::VALIDATION_FAILED,
            ServiceError::Pagination(_) => codes::INVALID_PAGINATION,
            ServiceError::NotAuthenticated => codes::NOT_AUTHENTICATED,
            ServiceError::Storage(_) => codes::STORAGE_FAILURE,
        }
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_message_hides_detail() {
        let err = ServiceError::from(StoreError::Unavailable("replica lag".to_string()));
        assert_eq!(err.to_string(), "Storage failure");
        assert_eq!(err.code(), codes::STORAGE_FAILURE);
    }

    #[test]
    fn test_extension_code() {
        let err = ServiceError::NotAuthenticated.extend();
        let code = err.extensions.as_ref().and_then(|ext| ext.get("code")).cloned();
        assert_eq!(code, Some(async_graphql::Value::from(codes::NOT_AUTHENTICATED)));
    }
}
