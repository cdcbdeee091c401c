mod common;

use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn create_nests_the_record_object() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-subdomains",
                "method": "create",
                "args": {
                    "object": { "subdomain": "my-site", "root_dir": "/alice/www" }
                }
            }));
            then.status(200).json_body(json!({
                "success": true,
                "result": {
                    "uid": "sd-1",
                    "subdomain": "my-site",
                    "root_dir": { "path": "/alice/www" }
                }
            }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let site = puter.hosting().create("my-site", "/alice/www").await.unwrap();

    create.assert_async().await;
    assert_eq!(site.uid, "sd-1");
    assert_eq!(site.subdomain, "my-site");
    assert_eq!(site.root_dir.unwrap()["path"], "/alice/www");
}

#[tokio::test]
async fn list_selects_subdomains_the_user_can_edit() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-subdomains",
                "method": "select",
                "args": { "predicate": ["user-can-edit"] }
            }));
            then.status(200).json_body(json!({
                "success": true,
                "result": [
                    { "uid": "sd-1", "subdomain": "my-site" },
                    { "uid": "sd-2", "subdomain": "test-app-d4f2c9aa" }
                ]
            }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    let sites = puter.hosting().list().await.unwrap();

    list.assert_async().await;
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[1].subdomain, "test-app-d4f2c9aa");
}

#[tokio::test]
async fn delete_addresses_the_subdomain_by_name() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(POST).path("/drivers/call").json_body(json!({
                "interface": "puter-subdomains",
                "method": "delete",
                "args": { "id": { "subdomain": "my-site" } }
            }));
            then.status(200)
                .json_body(json!({ "success": true, "result": true }));
        })
        .await;

    let puter = common::signed_in_sdk(&server);
    puter.hosting().delete("my-site").await.unwrap();

    delete.assert_async().await;
}
