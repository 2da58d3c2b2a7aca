use chrono::{Duration, Utc};
use market_service::auth::TokenService;
use market_service::build_router;
use market_service::handlers::AppState;
use market_service::store::MemoryStore;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// 임의 포트에 서버 실행 후 base url 반환
async fn spawn_server() -> String {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(TokenService::new(
            b"live-server-secret",
            Duration::minutes(5),
            Duration::days(1),
        )),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state).into_make_service())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

async fn login(client: &Client, base: &str, username: &str) -> String {
    let response = client
        .post(format!("{base}/register/"))
        .json(&json!({"username": username, "email": "", "password": "secret-pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let tokens: Value = client
        .post(format!("{base}/token/"))
        .json(&json!({"username": username, "password": "secret-pw"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    tokens["access"].as_str().unwrap().to_string()
}

/// 경매 생명주기 테스트 (HTTP)
#[tokio::test]
async fn test_auction_lifecycle_over_http() {
    let base = spawn_server().await;
    let client = Client::new();
    let seller = login(&client, &base, "seller").await;
    let buyer = login(&client, &base, "buyer").await;

    let created: Value = client
        .post(format!("{base}/products/auctions/"))
        .bearer_auth(&seller)
        .json(&json!({
            "name": "Guitar",
            "price": "300",
            "stock": 1,
            "start_price": "100",
            "end_time": (Utc::now() + Duration::minutes(30)).to_rfc3339(),
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let auction_id = created["auction"]["id"].as_i64().unwrap();

    let response = client
        .put(format!("{base}/products/auctions/{auction_id}/"))
        .bearer_auth(&buyer)
        .json(&json!({"bid": "175.5"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let auction: Value = response.json().await.unwrap();
    assert_eq!(auction["current_price"], "175.50");

    let response = client
        .patch(format!("{base}/products/auctions/{auction_id}/"))
        .bearer_auth(&seller)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .put(format!("{base}/products/auctions/{auction_id}/"))
        .bearer_auth(&buyer)
        .json(&json!({"bid": "900"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Auction has ended");

    let cart: Value = client
        .get(format!("{base}/cart/"))
        .bearer_auth(&buyer)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart[0]["product_name"], "Guitar");
}

/// 인증 없는 요청 거절
#[tokio::test]
async fn test_missing_token_is_rejected() {
    let base = spawn_server().await;
    let response = Client::new()
        .get(format!("{base}/user/creations/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
