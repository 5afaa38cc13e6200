// Data access layer: the `Store` seam, its Postgres and in-memory backends
pub mod schema;
pub mod queries;
pub mod memory;

pub use memory::MemoryStore;
pub use queries::PgStore;

use async_trait::async_trait;
use super::errors::StoreError;
use super::models::{Account, AccountTouch, NewTest, Pagination, Test, TestType};

// Typed CRUD operations against persisted accounts and tests
#[async_trait]
pub trait Store: Send + Sync {
    // Resolves a session token to the owning account id
    async fn account_for_token(&self, token: &str) -> Result<Option<String>, StoreError>;

    // Fetches an account by id
    async fn account(&self, id: &str) -> Result<Option<Account>, StoreError>;

    // Creates an immutable test row owned by the given account
    async fn create_test(&self, account_id: &str, result: &NewTest, mode: TestType) -> Result<Test, StoreError>;

    // Stamps activity metadata on an account and returns the updated row
    async fn touch_account(&self, id: &str, touch: AccountTouch) -> Result<Account, StoreError>;

    // Returns tests by descending wpm, sliced to the page (already validated)
    async fn leaderboard(&self, page: Pagination) -> Result<Vec<Test>, StoreError>;

    // Returns an account's tests, newest first
    async fn tests_for_account(&self, account_id: &str, page: Pagination) -> Result<Vec<Test>, StoreError>;
}
