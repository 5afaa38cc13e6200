// Application operations behind the GraphQL and REST surfaces.
//
// Every operation takes the caller [`Identity`] and its collaborators
// explicitly, so they can be exercised without an HTTP request.

use chrono::Utc;
use log::{info, warn};
use super::auth::Identity;
use super::cache::WordSetCache;
use super::database::Store;
use super::errors::ServiceError;
use super::metrics::{RESULTS_REJECTED, RESULTS_SUBMITTED, WORD_SETS_ISSUED};
use super::models::{Account, AccountTouch, NewTest, Pagination, Test, TestType};
use super::words::{WordGenerator, WordSet};

// Stores one typing result for the authenticated caller, tagged with `mode`.
pub async fn submit_result(
    store: &dyn Store,
    identity: &Identity,
    result: &NewTest,
    mode: TestType,
) -> Result<Test, ServiceError> {
    let outcome = create_checked(store, identity, result, mode).await;

    match &outcome {
        Ok(test) => {
            RESULTS_SUBMITTED.inc();
            info!("Stored {} result {} for account {} at {} wpm", mode.as_str(), test.id, test.account_id, test.wpm);
        }
        Err(_) => RESULTS_REJECTED.inc(),
    }
    outcome
}

async fn create_checked(
    store: &dyn Store,
    identity: &Identity,
    result: &NewTest,
    mode: TestType,
) -> Result<Test, ServiceError> {
    let account_id = identity.require()?;
    result.validate()?;
    Ok(store.create_test(account_id, result, mode).await?)
}

// Boolean flavour of [`submit_result`]: every failure is logged and reported as `false`.
pub async fn submit_result_flag(store: &dyn Store, identity: &Identity, result: &NewTest, mode: TestType) -> bool {
    match submit_result(store, identity, result, mode).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Dropping result from {}: {:?}", identity.label(), e);
            false
        }
    }
}

// Generates a fresh word set. Authenticated callers also get their account
// stamped as seen/playing and the set cached for resumption.
pub async fn issue_word_set(
    store: &dyn Store,
    cache: &WordSetCache,
    generator: &WordGenerator,
    identity: &Identity,
) -> Result<WordSet, ServiceError> {
    let set = generator.generate();

    if let Some(account_id) = identity.account_id() {
        let touch = AccountTouch { last_seen: Utc::now(), last_played: Some(TestType::Singleplayer) };
        store.touch_account(account_id, touch).await?;
        cache.insert(account_id, set.clone());
    }

    WORD_SETS_ISSUED.inc();
    Ok(set)
}

// Last word set issued to the caller, if it is still cached.
pub fn current_word_set(cache: &WordSetCache, identity: &Identity) -> Result<Option<WordSet>, ServiceError> {
    let account_id = identity.require()?;
    Ok(cache.get(account_id))
}

// Validates a page request and caps `first` at `max_page`.
pub fn clamp_page(page: Pagination, max_page: i32) -> Result<Pagination, ServiceError> {
    if page.skip < 0 {
        return Err(ServiceError::Pagination("skip must not be negative".to_string()));
    }
    if page.first < 0 {
        return Err(ServiceError::Pagination("first must not be negative".to_string()));
    }
    Ok(Pagination { skip: page.skip, first: page.first.min(max_page) })
}

// Global leaderboard ordered by descending wpm.
pub async fn leaderboard(store: &dyn Store, page: Pagination, max_page: i32) -> Result<Vec<Test>, ServiceError> {
    let page = clamp_page(page, max_page)?;
    if page.first == 0 {
        return Ok(Vec::new());
    }
    Ok(store.leaderboard(page).await?)
}

// The caller's own results, newest first.
pub async fn my_results(
    store: &dyn Store,
    identity: &Identity,
    page: Pagination,
    max_page: i32,
) -> Result<Vec<Test>, ServiceError> {
    let account_id = identity.require()?;
    let page = clamp_page(page, max_page)?;
    if page.first == 0 {
        return Ok(Vec::new());
    }
    Ok(store.tests_for_account(account_id, page).await?)
}

// Heartbeat: advances `lastSeen` for authenticated callers. Anonymous callers get `false`.
pub async fn seen(store: &dyn Store, identity: &Identity) -> Result<bool, ServiceError> {
    let Some(account_id) = identity.account_id() else {
        return Ok(false);
    };
    store
        .touch_account(account_id, AccountTouch { last_seen: Utc::now(), last_played: None })
        .await?;
    Ok(true)
}

// Account of the caller, `None` for anonymous callers.
pub async fn me(store: &dyn Store, identity: &Identity) -> Result<Option<Account>, ServiceError> {
    match identity.account_id() {
        Some(account_id) => Ok(store.account(account_id).await?),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(Pagination { skip: 5, first: 500 }, 100).unwrap(), Pagination { skip: 5, first: 100 });
        assert_eq!(clamp_page(Pagination { skip: 0, first: 0 }, 100).unwrap(), Pagination { skip: 0, first: 0 });
        assert!(matches!(clamp_page(Pagination { skip: -1, first: 10 }, 100), Err(ServiceError::Pagination(_))));
        assert!(matches!(clamp_page(Pagination { skip: 0, first: -10 }, 100), Err(ServiceError::Pagination(_))));
    }
}
