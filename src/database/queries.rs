use async_trait::async_trait;
use chrono::Utc;
use log::error;
use sqlx::{Pool, Postgres};
use super::Store;
use super::super::errors::StoreError;
use super::super::models::{Account, AccountTouch, NewTest, Pagination, Test, TestType};

const TEST_COLUMNS: &str =
    "id, cpm, raw_cpm, wpm, correct, incorrect, corrections, type, account_id, created_at";

// Postgres SQLSTATE for a foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

// Looks up the account owning a session token
pub async fn get_session_account(pool: &Pool<Postgres>, token: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT account_id FROM sessions WHERE token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await
}

// Queries a single account by id
pub async fn get_account(pool: &Pool<Postgres>, id: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT id, last_seen, last_played FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

// Inserts a test row linked to the account and returns it
pub async fn insert_test(
    pool: &Pool<Postgres>,
    account_id: &str,
    result: &NewTest,
    mode: TestType,
) -> Result<Test, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO tests (id, cpm, raw_cpm, wpm, correct, incorrect, corrections, type, account_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {TEST_COLUMNS}
        "#
    );
    sqlx::query_as(&sql)
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(result.cpm)
        .bind(result.raw_cpm)
        .bind(result.wpm)
        .bind(result.correct)
        .bind(result.incorrect)
        .bind(result.corrections)
        .bind(mode)
        .bind(account_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
}

// Updates last seen, and last played when given; `None` when the account is missing
pub async fn update_account(pool: &Pool<Postgres>, id: &str, touch: AccountTouch) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE accounts
        SET last_seen = $2, last_played = COALESCE($3, last_played)
        WHERE id = $1
        RETURNING id, last_seen, last_played
        "#,
    )
    .bind(id)
    .bind(touch.last_seen)
    .bind(touch.last_played)
    .fetch_optional(pool)
    .await
}

// Queries one leaderboard page ordered by descending wpm
pub async fn list_leaderboard(pool: &Pool<Postgres>, page: Pagination) -> Result<Vec<Test>, sqlx::Error> {
    let mut query_builder = sqlx::QueryBuilder::new(format!("SELECT {TEST_COLUMNS} FROM tests"));

    // Ties are broken so consecutive pages never overlap
    query_builder.push(" ORDER BY wpm DESC, created_at ASC, id ASC");
    query_builder.push(" OFFSET ");
    query_builder.push_bind(i64::from(page.skip));
    query_builder.push(" LIMIT ");
    query_builder.push_bind(i64::from(page.first));

    query_builder.build_query_as().fetch_all(pool).await
}

// Queries an account's tests, newest first
pub async fn list_account_tests(pool: &Pool<Postgres>, account_id: &str, page: Pagination) -> Result<Vec<Test>, sqlx::Error> {
    let sql = format!(
        "SELECT {TEST_COLUMNS} FROM tests WHERE account_id = $1 ORDER BY created_at DESC, id ASC OFFSET $2 LIMIT $3"
    );
    sqlx::query_as(&sql)
        .bind(account_id)
        .bind(i64::from(page.skip))
        .bind(i64::from(page.first))
        .fetch_all(pool)
        .await
}

// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn account_for_token(&self, token: &str) -> Result<Option<String>, StoreError> {
        Ok(get_session_account(&self.pool, token).await?)
    }

    async fn account(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(get_account(&self.pool, id).await?)
    }

    async fn create_test(&self, account_id: &str, result: &NewTest, mode: TestType) -> Result<Test, StoreError> {
        insert_test(&self.pool, account_id, result, mode).await.map_err(|e| {
            let missing_account = e
                .as_database_error()
                .and_then(|db| db.code())
                .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);
            if missing_account {
                StoreError::AccountNotFound(account_id.to_string())
            } else {
                error!("Failed to insert test for account {}: {}", account_id, e);
                StoreError::Database(e)
            }
        })
    }

    async fn touch_account(&self, id: &str, touch: AccountTouch) -> Result<Account, StoreError> {
        update_account(&self.pool, id, touch)
            .await?
            .ok_or_else(|| StoreError::AccountNotFound(id.to_string()))
    }

    async fn leaderboard(&self, page: Pagination) -> Result<Vec<Test>, StoreError> {
        Ok(list_leaderboard(&self.pool, page).await?)
    }

    async fn tests_for_account(&self, account_id: &str, page: Pagination) -> Result<Vec<Test>, StoreError> {
        Ok(list_account_tests(&self.pool, account_id, page).await?)
    }
}
