/// 상품 관련 커맨드 처리
// region:    --- Imports
use super::model::{
    CreateProductRequest, CreationView, Product, ProductFilter, ProductView, UpdateProductRequest,
};
use crate::auction::commands::sweep_expired;
use crate::auth::Principal;
use crate::error::{MarketError, Result};
use crate::store::{AuctionStore, CatalogStore, MarketStore, UserStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::info;
// endregion: --- Imports

/// 상품 생성 (소유자 = 요청자)
pub async fn create_product(
    store: &dyn MarketStore,
    principal: &Principal,
    req: CreateProductRequest,
    now: DateTime<Utc>,
) -> Result<ProductView> {
    let new = req.validate()?;
    let product = store.insert_product(principal.user_id, new, now).await?;
    info!(
        "{:<12} --> 상품 생성: product {} owner {}",
        "Command", product.id, principal.user_id
    );
    Ok(ProductView::new(product, principal.username.clone(), None))
}

/// 상품 단건 조회 (요청자 소유 상품만 보임)
pub async fn get_product(
    store: &dyn MarketStore,
    principal: &Principal,
    id: i64,
    now: DateTime<Utc>,
) -> Result<ProductView> {
    let product = store
        .get_product(id)
        .await?
        .filter(|p| p.owner_id == principal.user_id)
        .ok_or_else(|| MarketError::not_found("Product"))?;
    sweep_expired(store, now).await?;
    let auction = store.auction_for_product(product.id).await?;
    Ok(ProductView::new(product, principal.username.clone(), auction))
}

/// 상품 목록 (기본: 요청자 소유, `all` 이면 전체)
pub async fn list_products(
    store: &dyn MarketStore,
    principal: &Principal,
    all: bool,
    now: DateTime<Utc>,
) -> Result<Vec<ProductView>> {
    let filter = if all {
        ProductFilter::All
    } else {
        ProductFilter::Owner(principal.user_id)
    };
    sweep_expired(store, now).await?;

    let mut usernames = HashMap::from([(principal.user_id, principal.username.clone())]);
    let mut views = Vec::new();
    for product in store.list_products(filter).await? {
        let owner_username = owner_username(store, &mut usernames, product.owner_id).await?;
        let auction = store.auction_for_product(product.id).await?;
        views.push(ProductView::new(product, owner_username, auction));
    }
    Ok(views)
}

/// 상품 부분 수정 (소유자만)
pub async fn update_product(
    store: &dyn MarketStore,
    principal: &Principal,
    id: i64,
    req: UpdateProductRequest,
    now: DateTime<Utc>,
) -> Result<ProductView> {
    ensure_owner(store, principal, id, "edit").await?;
    let patch = req.validate()?;
    let product = store.update_product(id, patch, now).await?;
    info!("{:<12} --> 상품 수정: product {}", "Command", product.id);
    let auction = store.auction_for_product(product.id).await?;
    Ok(ProductView::new(product, principal.username.clone(), auction))
}

/// 상품 삭제 (소유자만, 경매와 장바구니 항목 함께 삭제)
pub async fn delete_product(store: &dyn MarketStore, principal: &Principal, id: i64) -> Result<()> {
    ensure_owner(store, principal, id, "delete").await?;
    store.delete_product(id).await?;
    info!("{:<12} --> 상품 삭제: product {}", "Command", id);
    Ok(())
}

/// 요청자가 등록한 상품 (경매 정보 포함, 최신순)
pub async fn list_user_creations(
    store: &dyn MarketStore,
    principal: &Principal,
    now: DateTime<Utc>,
) -> Result<Vec<CreationView>> {
    sweep_expired(store, now).await?;
    let mut views = Vec::new();
    for product in store
        .list_products(ProductFilter::Owner(principal.user_id))
        .await?
    {
        let auction = store.auction_for_product(product.id).await?;
        views.push(CreationView::new(product, auction));
    }
    Ok(views)
}

async fn ensure_owner(
    store: &dyn MarketStore,
    principal: &Principal,
    id: i64,
    action: &str,
) -> Result<Product> {
    let product = store
        .get_product(id)
        .await?
        .ok_or_else(|| MarketError::not_found("Product"))?;
    if product.owner_id != principal.user_id {
        return Err(MarketError::Forbidden(format!(
            "You do not have permission to {action} this product"
        )));
    }
    Ok(product)
}

async fn owner_username(
    store: &dyn MarketStore,
    cache: &mut HashMap<i64, String>,
    owner_id: i64,
) -> Result<String> {
    if let Some(name) = cache.get(&owner_id) {
        return Ok(name.clone());
    }
    let name = store
        .get_user(owner_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();
    cache.insert(owner_id, name.clone());
    Ok(name)
}
