/// 경매 관련 커맨드 처리
/// 1. 경매 상품 생성
/// 2. 경매 조회 (활성 경매만)
/// 3. 입찰
/// 4. 경매 비활성화
// region:    --- Imports
use super::model::{Auction, AuctionCreated, AuctionView, CreateAuctionRequest};
use crate::auth::Principal;
use crate::cart::model::CartReservation;
use crate::catalog::model::ProductView;
use crate::error::{MarketError, Result};
use crate::store::{AuctionStore, MarketStore};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands

/// 1. 경매 상품 생성
///
/// 상품과 경매 필드를 모두 검증한 뒤 하나의 트랜잭션으로 저장한다.
/// 경매 필드가 잘못되면 상품도 남지 않는다.
pub async fn create_auction(
    store: &dyn MarketStore,
    principal: &Principal,
    req: CreateAuctionRequest,
    now: DateTime<Utc>,
) -> Result<AuctionCreated> {
    info!(
        "{:<12} --> 경매 상품 생성 요청: owner {}",
        "Command", principal.user_id
    );
    let (new_product, new_auction) = req.validate(now)?;
    if new_auction.end_time <= new_auction.start_time {
        warn!(
            "{:<12} --> 종료 시간이 시작 시간 이전인 경매 생성 (입찰 시 즉시 종료 처리됨)",
            "Command"
        );
    }

    let (product, auction) = store
        .insert_product_with_auction(principal.user_id, new_product, new_auction, now)
        .await?;
    let view = AuctionView::new(
        auction,
        product.name.clone(),
        product.owner_id,
        principal.username.clone(),
        None,
    );
    info!(
        "{:<12} --> 경매 생성 완료: auction {} product {}",
        "Command", view.id, product.id
    );

    Ok(AuctionCreated {
        product: ProductView::new(product, principal.username.clone(), Some(view.clone())),
        auction: view,
    })
}

/// 2-1. 활성 경매 목록 (조회 전 만료 반영)
pub async fn list_auctions(store: &dyn MarketStore, now: DateTime<Utc>) -> Result<Vec<AuctionView>> {
    sweep_expired(store, now).await?;
    store.list_active_auctions().await
}

/// 2-2. 활성 경매 단건 조회. 종료된 경매는 NotFound
pub async fn get_auction(store: &dyn MarketStore, id: i64, now: DateTime<Utc>) -> Result<AuctionView> {
    store
        .modify_auction(
            id,
            Box::new(move |auction: &mut Auction, _owner_id: i64| -> Result<Option<CartReservation>> {
                if auction.expire_if_due(now) {
                    info!("{:<12} --> 경매 만료 반영: auction {}", "Command", auction.id);
                }
                if !auction.is_active {
                    return Err(MarketError::not_found("Auction"));
                }
                Ok(None)
            }),
        )
        .await
}

/// 3. 입찰
///
/// 수락되면 입찰자의 장바구니에 해당 상품을 1개 예약한다.
/// 이전 최고 입찰자의 예약은 회수하지 않는다.
/// 종료 여부는 경매 행 잠금을 얻은 시각 기준으로 판단한다.
pub async fn place_bid(
    store: &dyn MarketStore,
    principal: &Principal,
    auction_id: i64,
    raw_amount: String,
) -> Result<AuctionView> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: auction {} bidder {} amount {:?}",
        "Command", auction_id, principal.user_id, raw_amount
    );
    let bidder_id = principal.user_id;

    let result = store
        .modify_auction(
            auction_id,
            Box::new(move |auction: &mut Auction, owner_id: i64| -> Result<Option<CartReservation>> {
                auction.place_bid(owner_id, bidder_id, &raw_amount, Utc::now())?;
                Ok(Some(CartReservation {
                    user_id: bidder_id,
                    product_id: auction.product_id,
                    quantity: 1,
                }))
            }),
        )
        .await;

    match &result {
        Ok(view) => info!(
            "{:<12} --> 입찰 성공: auction {} 현재 가격 {}",
            "Command", view.id, view.current_price
        ),
        Err(e) => info!(
            "{:<12} --> 입찰 거절: auction {} ({})",
            "Command", auction_id, e
        ),
    }
    result
}

/// 4. 경매 비활성화 (소유자만, 멱등)
pub async fn deactivate_auction(
    store: &dyn MarketStore,
    principal: &Principal,
    auction_id: i64,
) -> Result<AuctionView> {
    info!(
        "{:<12} --> 경매 비활성화 요청: auction {} requester {}",
        "Command", auction_id, principal.user_id
    );
    let requester_id = principal.user_id;
    let view = store
        .modify_auction(
            auction_id,
            Box::new(move |auction: &mut Auction, owner_id: i64| -> Result<Option<CartReservation>> {
                auction.deactivate(owner_id, requester_id)?;
                Ok(None)
            }),
        )
        .await?;
    info!("{:<12} --> 경매 비활성화 완료: auction {}", "Command", view.id);
    Ok(view)
}

/// 종료 시간이 지난 경매 일괄 반영
pub async fn sweep_expired(store: &dyn MarketStore, now: DateTime<Utc>) -> Result<u64> {
    let expired = store.expire_due(now).await?;
    if expired > 0 {
        info!("{:<12} --> 경매 만료 반영: {}건", "Command", expired);
    }
    Ok(expired)
}

// endregion: --- Commands
