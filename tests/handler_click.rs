mod common;

use axum_test::TestServer;
use link_rotator::api::routes::router;
use serde_json::json;

#[tokio::test]
async fn test_click_recorded() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let response = server
        .post("/whatsapp/click")
        .json(&json!({ "linkId": "1", "stockSymbol": "aapl" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Click recorded");

    let stats = server
        .get("/whatsapp/stats")
        .await
        .json::<serde_json::Value>();
    assert_eq!(stats["linkStats"]["1"], 1);
    assert_eq!(stats["popularSymbols"]["AAPL"], 1);
}

#[tokio::test]
async fn test_click_accepts_legacy_account_id() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let response = server
        .post("/whatsapp/click")
        .json(&json!({ "accountId": "2" }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_click_blank_id_rejected() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let response = server
        .post("/whatsapp/click")
        .json(&json!({ "linkId": "  " }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_click_missing_id_rejected() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let response = server.post("/whatsapp/click").json(&json!({})).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_click_unknown_id_rejected() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let response = server
        .post("/whatsapp/click")
        .json(&json!({ "linkId": "does-not-exist" }))
        .await;

    response.assert_status_bad_request();

    let stats = server
        .get("/whatsapp/stats")
        .await
        .json::<serde_json::Value>();
    assert!(stats["linkStats"].get("does-not-exist").is_none());
}

#[tokio::test]
async fn test_click_ignores_unrenderable_stock_symbol() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    for symbol in ["", "腾讯控股"] {
        server
            .post("/whatsapp/click")
            .json(&json!({ "linkId": "1", "stockSymbol": symbol }))
            .await
            .assert_status_ok();
    }

    let stats = server
        .get("/whatsapp/stats")
        .await
        .json::<serde_json::Value>();
    assert_eq!(stats["linkStats"]["1"], 2);
    assert_eq!(stats["popularSymbols"], json!({}));
}
