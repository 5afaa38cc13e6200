use async_graphql::{Context, ErrorExtensions, Object};
use std::sync::Arc;
use super::super::auth::{identity, Authenticated};
use super::super::cache::WordSetCache;
use super::super::config::Config;
use super::super::database::Store;
use super::super::models::{Account, NewTest, Pagination, Test, TestType};
use super::super::operations;
use super::super::words::{WordGenerator, Words};

fn store<'a>(ctx: &'a Context<'_>) -> &'a dyn Store {
    ctx.data_unchecked::<Arc<dyn Store>>().as_ref()
}

// Separator used when the client asks for a joined word list
fn join_separator<'a>(ctx: &'a Context<'_>, join: bool) -> Option<&'a str> {
    join.then(|| ctx.data_unchecked::<Config>().word_join.as_str())
}

// Root object for GraphQL queries
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    // Top results across all accounts, fastest first
    async fn leaderboard(&self, ctx: &Context<'_>, filter: Pagination) -> async_graphql::Result<Vec<Test>> {
        let max_page = ctx.data_unchecked::<Config>().leaderboard_max_page;
        operations::leaderboard(store(ctx), filter, max_page)
            .await
            .map_err(|e| e.extend())
    }

    // Account of the caller, null when anonymous
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Account>> {
        operations::me(store(ctx), identity(ctx)).await.map_err(|e| e.extend())
    }

    // Results submitted by the caller, newest first
    #[graphql(guard = "Authenticated")]
    async fn my_results(&self, ctx: &Context<'_>, filter: Pagination) -> async_graphql::Result<Vec<Test>> {
        let max_page = ctx.data_unchecked::<Config>().leaderboard_max_page;
        operations::my_results(store(ctx), identity(ctx), filter, max_page)
            .await
            .map_err(|e| e.extend())
    }

    // Re-serves the caller's last issued word set while it is cached
    #[graphql(guard = "Authenticated")]
    async fn current_word_set(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = true)] join: bool,
    ) -> async_graphql::Result<Option<Words>> {
        let cache = ctx.data_unchecked::<Arc<WordSetCache>>();
        let set = operations::current_word_set(cache, identity(ctx)).map_err(|e| e.extend())?;
        Ok(set.map(|set| set.render(join_separator(ctx, join))))
    }
}

// Root object for GraphQL mutations
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    // Records a singleplayer result; failures are reported as `false`
    #[graphql(guard = "Authenticated")]
    async fn add_new_result(&self, ctx: &Context<'_>, result: NewTest) -> bool {
        operations::submit_result_flag(store(ctx), identity(ctx), &result, TestType::Singleplayer).await
    }

    // Records a singleplayer result and returns the stored row
    #[graphql(guard = "Authenticated")]
    async fn add_results(
        &self,
        ctx: &Context<'_>,
        cpm: f64,
        raw_cpm: f64,
        wpm: f64,
        correct: i32,
        incorrect: i32,
        corrections: i32,
    ) -> async_graphql::Result<Test> {
        let result = NewTest { cpm, raw_cpm, wpm, correct, incorrect, corrections };
        operations::submit_result(store(ctx), identity(ctx), &result, TestType::Singleplayer)
            .await
            .map_err(|e| e.extend())
    }

    // Issues a fresh practice word set
    async fn get_word_set(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = true)] join: bool,
    ) -> async_graphql::Result<Words> {
        let cache = ctx.data_unchecked::<Arc<WordSetCache>>();
        let generator = ctx.data_unchecked::<WordGenerator>();
        let set = operations::issue_word_set(store(ctx), cache, generator, identity(ctx))
            .await
            .map_err(|e| e.extend())?;
        Ok(set.render(join_separator(ctx, join)))
    }

    // Heartbeat keeping the caller's last seen time current
    async fn seen(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        operations::seen(store(ctx), identity(ctx)).await.map_err(|e| e.extend())
    }
}
