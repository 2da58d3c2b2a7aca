// region:    --- Imports
use super::{AppState, JsonBody, PathParam};
use crate::auction::commands;
use crate::auction::model::{AuctionCreated, AuctionView, BidRequest, CreateAuctionRequest};
use crate::auth::Principal;
use crate::error::Result;
use crate::money;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;
// endregion: --- Imports

/// 활성 경매 목록
pub async fn handle_list_auctions(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<Vec<AuctionView>>> {
    info!("{:<12} --> 활성 경매 목록 조회", "Handler");
    let auctions = commands::list_auctions(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(auctions))
}

/// 경매 상품 생성
pub async fn handle_create_auction(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(req): JsonBody<CreateAuctionRequest>,
) -> Result<(StatusCode, Json<AuctionCreated>)> {
    info!("{:<12} --> 경매 상품 생성 요청", "Handler");
    let created =
        commands::create_auction(state.store.as_ref(), &principal, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 경매 단건 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    _principal: Principal,
    PathParam(id): PathParam<i64>,
) -> Result<Json<AuctionView>> {
    info!("{:<12} --> 경매 조회 id: {}", "Handler", id);
    let auction = commands::get_auction(state.store.as_ref(), id, Utc::now()).await?;
    Ok(Json(auction))
}

/// 입찰
pub async fn handle_bid(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<BidRequest>,
) -> Result<Json<AuctionView>> {
    info!("{:<12} --> 입찰 요청 id: {}", "Handler", id);
    let raw_amount = money::raw_amount(req.bid.as_ref());
    let auction = commands::place_bid(state.store.as_ref(), &principal, id, raw_amount).await?;
    Ok(Json(auction))
}

/// 경매 비활성화
pub async fn handle_deactivate_auction(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<i64>,
) -> Result<Json<AuctionView>> {
    info!("{:<12} --> 경매 비활성화 요청 id: {}", "Handler", id);
    let auction = commands::deactivate_auction(state.store.as_ref(), &principal, id).await?;
    Ok(Json(auction))
}
