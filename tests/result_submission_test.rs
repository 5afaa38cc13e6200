// Integration tests for the result submission mutations
//
// - addNewResult keeps its boolean contract
// - addResults returns the stored row and surfaces typed errors
// - both reject anonymous callers before touching the store

mod common;

use async_graphql::Value;
use common::{add_result_mutation, alice, error_code, setup};
use typvp::database::Store;
use typvp::{Identity, Pagination, TestType};

const ALL: Pagination = Pagination { skip: 0, first: 100 };

#[tokio::test]
async fn test_add_new_result_creates_one_singleplayer_test() {
    let ctx = setup();

    let data = ctx.data(&add_result_mutation(60.0), alice()).await;
    assert_eq!(data["addNewResult"], true);

    let tests = ctx.store.tests_for_account("alice", ALL).await.unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].wpm, 60.0);
    assert_eq!(tests[0].test_type, TestType::Singleplayer);
    assert_eq!(tests[0].account_id, "alice");
}

#[tokio::test]
async fn test_add_new_result_requires_authentication() {
    let ctx = setup();

    let response = ctx.execute(&add_result_mutation(60.0), Identity::Anonymous).await;
    assert_eq!(error_code(&response), Some(Value::from("NOT_AUTHENTICATED")));
    assert!(ctx.store.leaderboard(ALL).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_new_result_reports_storage_failure_as_false() {
    let ctx = setup();
    ctx.store.set_unavailable(true);

    let data = ctx.data(&add_result_mutation(60.0), alice()).await;
    assert_eq!(data["addNewResult"], false);

    ctx.store.set_unavailable(false);
    assert!(ctx.store.leaderboard(ALL).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_new_result_reports_invalid_input_as_false() {
    let ctx = setup();

    let data = ctx.data(&add_result_mutation(-5.0), alice()).await;
    assert_eq!(data["addNewResult"], false);
    assert!(ctx.store.leaderboard(ALL).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_results_returns_created_record() {
    let ctx = setup();

    let data = ctx
        .data(
            "mutation { addResults(cpm: 300, rawCpm: 320, wpm: 60, correct: 58, incorrect: 2, corrections: 1) \
             { id cpm rawCpm wpm correct incorrect corrections type accountId } }",
            alice(),
        )
        .await;

    let created = &data["addResults"];
    assert_eq!(created["cpm"], 300.0);
    assert_eq!(created["rawCpm"], 320.0);
    assert_eq!(created["wpm"], 60.0);
    assert_eq!(created["correct"], 58);
    assert_eq!(created["incorrect"], 2);
    assert_eq!(created["corrections"], 1);
    assert_eq!(created["type"], "SINGLEPLAYER");
    assert_eq!(created["accountId"], "alice");

    let stored = ctx.store.tests_for_account("alice", ALL).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(created["id"], stored[0].id.as_str());
}

#[tokio::test]
async fn test_add_results_surfaces_distinct_errors() {
    let ctx = setup();
    let mutation = "mutation { addResults(cpm: 300, rawCpm: 320, wpm: 60, correct: 58, incorrect: -2, corrections: 1) { id } }";

    let invalid = ctx.execute(mutation, alice()).await;
    assert_eq!(error_code(&invalid), Some(Value::from("VALIDATION_FAILED")));

    let anonymous = ctx.execute(mutation, Identity::Anonymous).await;
    assert_eq!(error_code(&anonymous), Some(Value::from("NOT_AUTHENTICATED")));

    ctx.store.set_unavailable(true);
    let valid = "mutation { addResults(cpm: 300, rawCpm: 320, wpm: 60, correct: 58, incorrect: 2, corrections: 1) { id } }";
    let unavailable = ctx.execute(valid, alice()).await;
    assert_eq!(error_code(&unavailable), Some(Value::from("STORAGE_FAILURE")));
    assert_eq!(unavailable.errors[0].message, "Storage failure");
}

#[tokio::test]
async fn test_account_owning_session_that_vanished_is_a_storage_failure() {
    let ctx = setup();
    let ghost = Identity::Account("ghost".to_string());

    let response = ctx
        .execute(
            "mutation { addResults(cpm: 100, rawCpm: 100, wpm: 20, correct: 10, incorrect: 0, corrections: 0) { id } }",
            ghost,
        )
        .await;
    assert_eq!(error_code(&response), Some(Value::from("STORAGE_FAILURE")));
}

#[tokio::test]
async fn test_my_results_lists_only_the_callers_tests() {
    let ctx = setup();
    ctx.data(&add_result_mutation(40.0), alice()).await;
    ctx.data(&add_result_mutation(80.0), common::bob()).await;

    let data = ctx.data("{ myResults(filter: {skip: 0, first: 10}) { wpm accountId } }", alice()).await;
    let results = data["myResults"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["accountId"], "alice");
    assert_eq!(results[0]["wpm"], 40.0);
}
