// region:    --- Imports
use super::{AppState, JsonBody};
use crate::auth::Principal;
use crate::cart::commands;
use crate::cart::model::{
    AddCartItemRequest, CartItem, CartItemView, RemoveCartItemRequest, UpdateCartItemRequest,
};
use crate::error::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;
// endregion: --- Imports

/// 장바구니 조회
pub async fn handle_get_cart(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<CartItemView>>> {
    info!("{:<12} --> 장바구니 조회 user: {}", "Handler", principal.user_id);
    Ok(Json(commands::list_items(state.store.as_ref(), &principal).await?))
}

/// 장바구니 추가
pub async fn handle_add_to_cart(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(req): JsonBody<AddCartItemRequest>,
) -> Result<(StatusCode, Json<CartItem>)> {
    info!("{:<12} --> 장바구니 추가 product: {}", "Handler", req.product_id);
    let item = commands::add_item(state.store.as_ref(), &principal, req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// 장바구니 수량 변경
pub async fn handle_update_cart(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(req): JsonBody<UpdateCartItemRequest>,
) -> Result<Json<CartItem>> {
    info!("{:<12} --> 장바구니 수량 변경 product: {}", "Handler", req.product_id);
    Ok(Json(commands::update_item(state.store.as_ref(), &principal, req).await?))
}

/// 장바구니 삭제
pub async fn handle_remove_from_cart(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(req): JsonBody<RemoveCartItemRequest>,
) -> Result<Json<Value>> {
    info!("{:<12} --> 장바구니 삭제 product: {}", "Handler", req.product_id);
    commands::remove_item(state.store.as_ref(), &principal, req).await?;
    Ok(Json(json!({ "message": "Item removed from cart" })))
}
