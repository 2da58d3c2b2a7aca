#![allow(dead_code)]

use chrono::{Duration, Utc};
use market_service::auction::commands;
use market_service::auction::model::AuctionCreated;
use market_service::auth::user::NewUser;
use market_service::auth::Principal;
use market_service::error::MarketError;
use market_service::store::{CartStore, MarketStore, UserStore};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

/// 테스트 사용자 생성
pub async fn principal(store: &dyn MarketStore, username: &str) -> Principal {
    let user = store
        .create_user(NewUser {
            username: username.to_string(),
            email: String::new(),
            password_hash: String::new(),
        })
        .await
        .unwrap();
    Principal {
        user_id: user.id,
        username: user.username,
    }
}

/// 경매 상품 생성
pub async fn auction(
    store: &dyn MarketStore,
    owner: &Principal,
    start_price: &str,
    ends_in: Duration,
) -> AuctionCreated {
    let request = serde_json::from_value(json!({
        "name": "Concurrent item",
        "description": "",
        "price": "1.00",
        "stock": 1,
        "start_price": start_price,
        "end_time": (Utc::now() + ends_in).to_rfc3339(),
    }))
    .unwrap();
    commands::create_auction(store, owner, request, Utc::now())
        .await
        .unwrap()
}

/// 50개의 동시 입찰 후 최종 상태 검증
pub async fn assert_concurrent_bidding(store: Arc<dyn MarketStore>, prefix: &str) {
    let owner = principal(store.as_ref(), &format!("{prefix}-owner")).await;
    let created = auction(store.as_ref(), &owner, "100", Duration::hours(1)).await;
    let auction_id = created.auction.id;

    let mut handles = vec![];
    for i in 1..=50i64 {
        let store = Arc::clone(&store);
        let username = format!("{prefix}-bidder-{i}");
        handles.push(tokio::spawn(async move {
            let bidder = principal(store.as_ref(), &username).await;
            let amount = 100 + i;
            let result =
                commands::place_bid(store.as_ref(), &bidder, auction_id, amount.to_string()).await;
            (bidder, amount, result)
        }));
    }

    let mut winners = vec![];
    for handle in handles {
        let (bidder, amount, result) = handle.await.unwrap();
        match result {
            Ok(view) => {
                // 응답은 자기 입찰이 반영된 상태
                assert_eq!(view.highest_bidder_id, Some(bidder.user_id));
                assert_eq!(view.current_price, Decimal::from(amount));
                winners.push(bidder);
            }
            Err(e) => assert!(matches!(e, MarketError::BidTooLow), "unexpected: {e}"),
        }
    }
    assert!(!winners.is_empty());

    let auction = commands::get_auction(store.as_ref(), auction_id, Utc::now())
        .await
        .unwrap();
    assert_eq!(auction.current_price.to_string(), "150.00");
    let top = winners
        .iter()
        .find(|p| p.username.ends_with("-bidder-50"))
        .expect("highest bid must be accepted");
    assert_eq!(auction.highest_bidder_id, Some(top.user_id));

    // 수락된 입찰마다 장바구니 예약 1건
    for bidder in &winners {
        let cart = store.get_or_create_cart(bidder.user_id).await.unwrap();
        let items = store.list_cart_items(cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
    }
}
