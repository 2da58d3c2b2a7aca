//! PostgreSQL 저장소 테스트. DATABASE_URL 이 없으면 건너뛴다.
mod common;

use chrono::{Duration, Utc};
use market_service::auction::commands;
use market_service::cart::commands as cart_commands;
use market_service::cart::model::AddCartItemRequest;
use market_service::catalog::commands as catalog_commands;
use market_service::error::MarketError;
use market_service::store::{AuctionStore, CartStore, CatalogStore, PostgresStore};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 스키마 적용이 동시에 실행되지 않도록 직렬화
static CONNECT: Mutex<()> = Mutex::const_new(());

async fn connect() -> Option<Arc<PostgresStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL 미설정: PostgreSQL 테스트 건너뜀");
        return None;
    };
    let _guard = CONNECT.lock().await;
    Some(Arc::new(PostgresStore::connect(&url, 20).await.unwrap()))
}

/// 실행마다 겹치지 않는 사용자명
fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Utc::now().timestamp_micros())
}

/// 동시성 입찰 테스트 (행 잠금)
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bidding() {
    let Some(store) = connect().await else { return };
    common::assert_concurrent_bidding(store, &unique("pg")).await;
}

/// 상품 삭제 시 경매와 장바구니 항목도 삭제
#[tokio::test]
async fn test_delete_product_cascades() {
    let Some(store) = connect().await else { return };
    let prefix = unique("pg-cascade");
    let owner = common::principal(store.as_ref(), &format!("{prefix}-owner")).await;
    let bidder = common::principal(store.as_ref(), &format!("{prefix}-bidder")).await;
    let created = common::auction(store.as_ref(), &owner, "100", Duration::hours(1)).await;

    commands::place_bid(store.as_ref(), &bidder, created.auction.id, "120".into())
        .await
        .unwrap();
    let cart = store.get_or_create_cart(bidder.user_id).await.unwrap();
    assert_eq!(store.list_cart_items(cart.id).await.unwrap().len(), 1);

    catalog_commands::delete_product(store.as_ref(), &owner, created.product.id)
        .await
        .unwrap();

    assert!(store.get_product(created.product.id).await.unwrap().is_none());
    assert!(store
        .get_auction_view(created.auction.id)
        .await
        .unwrap()
        .is_none());
    assert!(store.list_cart_items(cart.id).await.unwrap().is_empty());
}

/// 장바구니 수량 증가와 범위 초과
#[tokio::test]
async fn test_cart_increment_and_overflow() {
    let Some(store) = connect().await else { return };
    let prefix = unique("pg-cart");
    let seller = common::principal(store.as_ref(), &format!("{prefix}-seller")).await;
    let buyer = common::principal(store.as_ref(), &format!("{prefix}-buyer")).await;
    let request = serde_json::from_value(json!({"name": "Mug", "price": "8.50", "stock": 3})).unwrap();
    let product = catalog_commands::create_product(store.as_ref(), &seller, request, Utc::now())
        .await
        .unwrap();

    for _ in 0..2 {
        cart_commands::add_item(
            store.as_ref(),
            &buyer,
            AddCartItemRequest {
                product_id: product.id,
                quantity: None,
            },
        )
        .await
        .unwrap();
    }
    let err = cart_commands::add_item(
        store.as_ref(),
        &buyer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(i32::MAX),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)), "{err}");

    let items = cart_commands::list_items(store.as_ref(), &buyer).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
}

/// 거절된 입찰도 지연 만료는 저장
#[tokio::test]
async fn test_rejected_bid_persists_expiry() {
    let Some(store) = connect().await else { return };
    let prefix = unique("pg-expiry");
    let owner = common::principal(store.as_ref(), &format!("{prefix}-owner")).await;
    let bidder = common::principal(store.as_ref(), &format!("{prefix}-bidder")).await;
    let created = common::auction(store.as_ref(), &owner, "10", Duration::seconds(-1)).await;

    let err = commands::place_bid(store.as_ref(), &bidder, created.auction.id, "20".into())
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::AuctionEnded));

    let auction = store
        .get_auction_view(created.auction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!auction.is_active);
    assert_eq!(auction.current_price.to_string(), "10.00");
}
