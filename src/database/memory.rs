use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use super::Store;
use super::super::errors::StoreError;
use super::super::models::{Account, AccountTouch, NewTest, Pagination, Test, TestType};

// In-process store used when no database is configured, and by the test suite
#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    sessions: DashMap<String, String>,
    tests: RwLock<Vec<Test>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Registers an account with no activity recorded yet
    pub fn with_account(self, id: &str) -> Self {
        self.accounts.insert(
            id.to_string(),
            Account { id: id.to_string(), last_seen: None, last_played: None },
        );
        self
    }

    // Registers a session token for an account, creating the account if needed
    pub fn with_session(self, token: &str, account_id: &str) -> Self {
        let store = if self.accounts.contains_key(account_id) { self } else { self.with_account(account_id) };
        store.sessions.insert(token.to_string(), account_id.to_string());
        store
    }

    // Makes every subsequent call fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

fn slice(tests: Vec<Test>, page: Pagination) -> Vec<Test> {
    tests
        .into_iter()
        .skip(page.skip.max(0) as usize)
        .take(page.first.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn account_for_token(&self, token: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.sessions.get(token).map(|entry| entry.value().clone()))
    }

    async fn account(&self, id: &str) -> Result<Option<Account>, StoreError> {
        self.check_available()?;
        Ok(self.accounts.get(id).map(|entry| entry.value().clone()))
    }

    async fn create_test(&self, account_id: &str, result: &NewTest, mode: TestType) -> Result<Test, StoreError> {
        self.check_available()?;
        if !self.accounts.contains_key(account_id) {
            return Err(StoreError::AccountNotFound(account_id.to_string()));
        }

        let test = Test {
            id: uuid::Uuid::new_v4().to_string(),
            cpm: result.cpm,
            raw_cpm: result.raw_cpm,
            wpm: result.wpm,
            correct: result.correct,
            incorrect: result.incorrect,
            corrections: result.corrections,
            test_type: mode,
            account_id: account_id.to_string(),
            created_at: Utc::now(),
        };
        self.tests.write().await.push(test.clone());
        Ok(test)
    }

    async fn touch_account(&self, id: &str, touch: AccountTouch) -> Result<Account, StoreError> {
        self.check_available()?;
        let mut account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::AccountNotFound(id.to_string()))?;
        account.last_seen = Some(touch.last_seen);
        if let Some(mode) = touch.last_played {
            account.last_played = Some(mode);
        }
        Ok(account.clone())
    }

    async fn leaderboard(&self, page: Pagination) -> Result<Vec<Test>, StoreError> {
        self.check_available()?;
        let mut tests = self.tests.read().await.clone();
        tests.sort_by(|a, b| {
            b.wpm
                .total_cmp(&a.wpm)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(slice(tests, page))
    }

    async fn tests_for_account(&self, account_id: &str, page: Pagination) -> Result<Vec<Test>, StoreError> {
        self.check_available()?;
        let mut tests: Vec<Test> = self
            .tests
            .read()
            .await
            .iter()
            .filter(|test| test.account_id == account_id)
            .cloned()
            .collect();
        tests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(slice(tests, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(wpm: f64) -> NewTest {
        NewTest { cpm: wpm * 5.0, raw_cpm: wpm * 5.0, wpm, correct: 10, incorrect: 0, corrections: 0 }
    }

    #[tokio::test]
    async fn test_sessions_resolve_to_accounts() {
        let store = MemoryStore::new().with_session("token-a", "alice");
        assert_eq!(store.account_for_token("token-a").await.unwrap().as_deref(), Some("alice"));
        assert_eq!(store.account_for_token("nope").await.unwrap(), None);
        assert!(store.account("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_test_requires_account() {
        let store = MemoryStore::new();
        let err = store.create_test("ghost", &result(50.0), TestType::Singleplayer).await.unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_wpm() {
        let store = MemoryStore::new().with_account("alice");
        for wpm in [40.0, 90.0, 65.0] {
            store.create_test("alice", &result(wpm), TestType::Singleplayer).await.unwrap();
        }
        let page = store.leaderboard(Pagination { skip: 0, first: 2 }).await.unwrap();
        let speeds: Vec<f64> = page.iter().map(|t| t.wpm).collect();
        assert_eq!(speeds, vec![90.0, 65.0]);
    }

    #[tokio::test]
    async fn test_touch_keeps_last_played_when_absent() {
        let store = MemoryStore::new().with_account("alice");
        let now = Utc::now();
        store
            .touch_account("alice", AccountTouch { last_seen: now, last_played: Some(TestType::Singleplayer) })
            .await
            .unwrap();
        let account = store.touch_account("alice", AccountTouch { last_seen: now, last_played: None }).await.unwrap();
        assert_eq!(account.last_played, Some(TestType::Singleplayer));
        assert_eq!(account.last_seen, Some(now));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new().with_account("alice");
        store.set_unavailable(true);
        assert!(matches!(store.account("alice").await, Err(StoreError::Unavailable(_))));
        store.set_unavailable(false);
        assert!(store.account("alice").await.is_ok());
    }
}
