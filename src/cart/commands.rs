/// 장바구니 관련 커맨드 처리 (요청자 본인의 장바구니만 다룸)
// region:    --- Imports
use super::model::{
    AddCartItemRequest, CartItem, CartItemView, RemoveCartItemRequest, UpdateCartItemRequest,
};
use crate::auth::Principal;
use crate::error::{MarketError, Result};
use crate::store::{CartStore, MarketStore};
use tracing::info;
// endregion: --- Imports

fn validate_quantity(quantity: i32) -> Result<i32> {
    if quantity < 1 {
        return Err(MarketError::Validation(
            "quantity: Ensure this value is greater than or equal to 1.".into(),
        ));
    }
    Ok(quantity)
}

/// 장바구니 항목 조회
pub async fn list_items(store: &dyn MarketStore, principal: &Principal) -> Result<Vec<CartItemView>> {
    let cart = store.get_or_create_cart(principal.user_id).await?;
    store.list_cart_items(cart.id).await
}

/// 상품 추가 (이미 있으면 수량 증가)
pub async fn add_item(
    store: &dyn MarketStore,
    principal: &Principal,
    req: AddCartItemRequest,
) -> Result<CartItem> {
    let quantity = validate_quantity(req.quantity.unwrap_or(1))?;
    let cart = store.get_or_create_cart(principal.user_id).await?;
    let item = store
        .add_or_increment(cart.id, req.product_id, quantity)
        .await?;
    info!(
        "{:<12} --> 장바구니 추가: cart {} product {} quantity {}",
        "Command", cart.id, item.product_id, item.quantity
    );
    Ok(item)
}

/// 수량 변경
pub async fn update_item(
    store: &dyn MarketStore,
    principal: &Principal,
    req: UpdateCartItemRequest,
) -> Result<CartItem> {
    let quantity = validate_quantity(req.quantity)?;
    let cart = store.get_or_create_cart(principal.user_id).await?;
    store.set_quantity(cart.id, req.product_id, quantity).await
}

/// 항목 삭제
pub async fn remove_item(
    store: &dyn MarketStore,
    principal: &Principal,
    req: RemoveCartItemRequest,
) -> Result<()> {
    let cart = store.get_or_create_cart(principal.user_id).await?;
    store.remove_item(cart.id, req.product_id).await?;
    info!(
        "{:<12} --> 장바구니 삭제: cart {} product {}",
        "Command", cart.id, req.product_id
    );
    Ok(())
}
