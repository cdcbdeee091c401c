mod common;

use httpmock::prelude::*;
use puter::MAX_KEY_LENGTH;
use puter::errors::{Error, RequestError};
use serde_json::json;

#[tokio::test]
async fn get_is_idempotent() {
    let server = MockServer::start_async().await;
    let get = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-kvstore",
                "method": "get",
                "args": { "key": "greeting" }
            }));
            then.status(200)
                .json_body(json!({ "success": true, "result": "hello" }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let kv = puter.kv();

    let first = kv.get("greeting").await.unwrap();
    let second = kv.get("greeting").await.unwrap();

    assert_eq!(first, Some(json!("hello")));
    assert_eq!(first, second);
    assert_eq!(get.hits_async().await, 2);
}

#[tokio::test]
async fn set_sends_arbitrary_json_values() {
    let server = MockServer::start_async().await;
    let set = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-kvstore",
                "method": "set",
                "args": { "key": "config", "value": { "theme": "dark" } }
            }));
            then.status(200)
                .json_body(json!({ "success": true, "result": true }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    puter
        .kv()
        .set("config", &json!({ "theme": "dark" }))
        .await
        .unwrap();

    set.assert_async().await;
}

#[tokio::test]
async fn unset_keys_read_as_none() {
    let server = MockServer::start_async().await;
    let _get = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call");
            then.status(200)
                .json_body(json!({ "success": true, "result": null }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let value = puter.kv().get("missing").await.unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn boundary_keys_pass_and_oversized_keys_fail_locally() {
    let server = MockServer::start_async().await;
    let any_call = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call");
            then.status(200)
                .json_body(json!({ "success": true, "result": true }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let kv = puter.kv();

    // Exactly at the limit: accepted and sent.
    let exactly = "k".repeat(MAX_KEY_LENGTH);
    kv.set(&exactly, &1).await.unwrap();
    assert_eq!(any_call.hits_async().await, 1);

    // One over: rejected before any request goes out.
    let oversized = "k".repeat(MAX_KEY_LENGTH + 1);
    let err = kv.set(&oversized, &1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Request(RequestError::Validation { .. })
    ));
    assert_eq!(any_call.hits_async().await, 1);
}

#[tokio::test]
async fn backend_failures_carry_the_error_envelope() {
    let server = MockServer::start_async().await;
    let _get = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call");
            then.status(200).json_body(json!({
                "success": false,
                "error": { "code": "permission_denied", "message": "No kv access." }
            }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let err = puter.kv().get("greeting").await.unwrap_err();
    match err {
        Error::Request(RequestError::Backend(e)) => {
            assert_eq!(e.code, "permission_denied");
            assert_eq!(e.message, "No kv access.");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn incr_returns_the_new_value() {
    let server = MockServer::start_async().await;
    let incr = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-kvstore",
                "method": "incr",
                "args": { "key": "visits", "amount": 1 }
            }));
            then.status(200)
                .json_body(json!({ "success": true, "result": 3 }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let value = puter.kv().incr("visits").await.unwrap();

    incr.assert_async().await;
    assert_eq!(value, 3);
}

#[tokio::test]
async fn list_passes_the_pattern() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-kvstore",
                "method": "list",
                "args": { "pattern": "user:*" }
            }));
            then.status(200)
                .json_body(json!({ "success": true, "result": ["user:1", "user:2"] }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let keys = puter.kv().list(Some("user:*")).await.unwrap();

    list.assert_async().await;
    assert_eq!(keys, vec!["user:1".to_string(), "user:2".to_string()]);
}

#[tokio::test]
async fn flush_sends_no_arguments() {
    let server = MockServer::start_async().await;
    let flush = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-kvstore",
                "method": "flush",
                "args": {}
            }));
            then.status(200)
                .json_body(json!({ "success": true, "result": true }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    puter.kv().flush().await.unwrap();

    flush.assert_async().await;
}
