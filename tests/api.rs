mod helpers;

use helpers::setup::spawn_app;
use serde_json::{json, Value};

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, address) = spawn_app().await;
    let res = reqwest::get(format!("{}/", address)).await.unwrap();
    assert!(res.status().is_success());
}

#[actix_web::main]
#[test]
async fn test_webhook_requires_the_shared_secret() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/webhooks", address))
        .json(&json!({ "type": "payment", "data": { "userId": "u1" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client
        .post(format!("{}/webhooks", address))
        .header("x-webhook-token", "wrong secret")
        .json(&json!({ "type": "payment", "data": { "userId": "u1" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
}

#[actix_web::main]
#[test]
async fn test_webhook_dispatch_reports_recipients_without_tokens() {
    let (app, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/webhooks", address))
        .header("x-webhook-token", &app.config.webhook_secret)
        .json(&json!({ "type": "payment", "data": { "userId": "u1", "amount": 42 } }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["notified"], json!(false));
    assert_eq!(body["notifiedUsers"], json!(1));
    assert_eq!(body["userResults"][0]["userId"], json!("u1"));
    assert_eq!(body["userResults"][0]["reason"], json!("No tokens available"));
}

#[actix_web::main]
#[test]
async fn test_webhook_rejects_unclassifiable_payloads() {
    let (app, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/webhooks", address))
        .header("x-webhook-token", &app.config.webhook_secret)
        .json(&json!({ "data": { "userId": "u1" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 422);
}

#[actix_web::main]
#[test]
async fn test_token_registration_lifecycle() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/tokens/register", address))
        .json(&json!({ "userId": "u1", "token": "t1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 201);

    // Same pair again is an update, not a new record
    let res = client
        .post(format!("{}/tokens/register", address))
        .json(&json!({
            "userId": "u1",
            "token": "t1",
            "deviceInfo": { "platform": "ios" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = client
        .get(format!("{}/tokens/user/u1", address))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["tokens"].as_array().unwrap().len(), 1);
    assert_eq!(body["tokens"][0]["deviceInfo"]["platform"], json!("ios"));

    let res = client
        .post(format!("{}/tokens/remove", address))
        .json(&json!({ "userId": "u1", "token": "t1" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["removed"], json!(true));

    // Removal is idempotent
    let res = client
        .post(format!("{}/tokens/remove", address))
        .json(&json!({ "userId": "u1", "token": "t1" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["removed"], json!(false));
}

#[actix_web::main]
#[test]
async fn test_token_registration_rejects_blank_fields() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/tokens/register", address))
        .json(&json!({ "userId": "", "token": "t1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_web::main]
#[test]
async fn test_stale_purge_is_protected() {
    let (app, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}/tokens/stale", address))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client
        .delete(format!("{}/tokens/stale?days=30", address))
        .header("x-webhook-token", &app.config.webhook_secret)
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["purged"], json!(0));
}
