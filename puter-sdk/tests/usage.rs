mod common;

use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn disk_usage_posts_an_empty_body() {
    let server = MockServer::start_async().await;
    let df = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/df")
                .header("authorization", "Bearer token-1")
                .json_body(json!({}));
            then.status(200).json_body(json!({
                "used": 1_048_576,
                "capacity": 10_737_418_240_u64,
                "plan": "free"
            }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let usage = puter.usage().disk_usage().await.unwrap();

    df.assert_async().await;
    assert_eq!(usage.used, 1_048_576);
    assert_eq!(usage.capacity, 10_737_418_240);
    assert_eq!(usage.extra.get("plan"), Some(&json!("free")));
}

#[tokio::test]
async fn usage_info_is_fetched_with_get() {
    let server = MockServer::start_async().await;
    let info = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/drivers/usage")
                .header("authorization", "Bearer token-1");
            then.status(200).json_body(json!({
                "usages": [
                    { "service": "ai-chat", "used": 12, "limit": 100 },
                    { "service": "kv", "used": 3 }
                ]
            }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let report = puter.usage().usage_info().await.unwrap();

    info.assert_async().await;
    assert_eq!(report.usages.len(), 2);
    assert_eq!(report.usages[0]["service"], "ai-chat");
}
