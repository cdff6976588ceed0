mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use link_rotator::api::routes::router;
use serde_json::json;

fn server() -> TestServer {
    TestServer::new(router(common::create_test_state())).unwrap()
}

#[tokio::test]
async fn test_config_requires_bearer() {
    let server = server();

    let response = server.get("/whatsapp/config").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_config_rejects_wrong_key() {
    let server = server();

    let response = server
        .post("/whatsapp/config")
        .add_header("Authorization", "Bearer not-the-key")
        .json(&json!({ "target": "https://wa.me/15559999999" }))
        .await;

    response.assert_status_unauthorized();

    let links = server
        .get("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .await
        .json::<serde_json::Value>();
    assert_eq!(links["links"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_config_rejects_admin_key_outside_bearer_scheme() {
    let server = server();

    let response = server
        .get("/whatsapp/config")
        .add_header("Authorization", format!("Basic {}", common::ADMIN_KEY))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn test_config_lists_seeded_links() {
    let server = server();

    let response = server
        .get("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let ids: Vec<&str> = json["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(json["links"][2]["enabled"], false);
}

#[tokio::test]
async fn test_config_add_link() {
    let server = server();

    let response = server
        .post("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .json(&json!({
            "url": "https://wa.me/15559999999",
            "name": "Night desk",
            "maxDailyClicks": 50
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["link"]["target"], "https://wa.me/15559999999");
    assert_eq!(json["link"]["label"], "Night desk");
    assert_eq!(json["link"]["weight"], 1);
    assert_eq!(json["link"]["enabled"], true);
    assert_eq!(json["link"]["maxDailyQuota"], 50);

    let id = json["link"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let links = server
        .get("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .await
        .json::<serde_json::Value>();
    let last = links["links"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["id"], id);
}

#[tokio::test]
async fn test_config_add_rejects_zero_weight() {
    let server = server();

    let response = server
        .post("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .json(&json!({ "target": "https://wa.me/15559999999", "weight": 0 }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_config_update_link() {
    let server = server();

    let response = server
        .put("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .json(&json!({ "id": "1", "weight": 5, "label": null }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["link"]["id"], "1");
    assert_eq!(json["link"]["weight"], 5);
    assert!(json["link"].get("label").is_none());
    assert_eq!(json["link"]["specialization"], "US_STOCKS");
    assert!(json["link"]["updatedAt"].is_string());
}

#[tokio::test]
async fn test_config_update_unknown_link() {
    let server = server();

    let response = server
        .put("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .json(&json!({ "id": "nope", "enabled": true }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_config_delete_link() {
    let server = server();

    let response = server
        .delete("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .json(&json!({ "id": "2" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["success"], true);

    let again = server
        .delete("/whatsapp/config")
        .add_header("Authorization", common::bearer())
        .json(&json!({ "id": "2" }))
        .await;
    again.assert_status_not_found();

    // Only entry 1 remains enabled.
    let json = server
        .get("/whatsapp/link")
        .await
        .json::<serde_json::Value>();
    assert_eq!(json["link"]["id"], "1");
}
