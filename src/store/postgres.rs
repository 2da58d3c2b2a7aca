//! PostgreSQL 저장소
//!
//! 입찰, 비활성화, 단건 조회 시의 지연 만료는 `SELECT ... FOR UPDATE` 로 경매 행을
//! 잠근 트랜잭션 안에서 실행된다. 같은 경매에 대한 동시 입찰은 행 잠금으로 직렬화된다.
// region:    --- Imports
use super::{AuctionMutation, AuctionStore, CartStore, CatalogStore, UserStore};
use crate::auction::model::{Auction, AuctionView, NewAuction};
use crate::auth::user::{NewUser, User};
use crate::cart::model::{Cart, CartItem, CartItemView};
use crate::catalog::model::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::database::DatabaseManager;
use crate::error::{MarketError, Result};
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Row};
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

/// PostgreSQL 저장소
pub struct PostgresStore {
    db: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// 연결 후 스키마 적용 (여러 번 실행해도 안전)
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let db = DatabaseManager::new(database_url, max_connections).await?;
        sqlx::raw_sql(queries::SCHEMA).execute(db.pool()).await?;
        info!("{:<12} --> 스키마 적용 완료", "Store");
        Ok(Self::new(Arc::new(db)))
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false)
}

/// numeric_value_out_of_range (22003) 는 수량 검증 오류로 변환
fn map_quantity_error(e: sqlx::Error) -> MarketError {
    let out_of_range = e
        .as_database_error()
        .and_then(|d| d.code())
        .is_some_and(|code| code == "22003");
    if out_of_range {
        MarketError::quantity_out_of_range()
    } else {
        e.into()
    }
}

// region:    --- User Store
#[async_trait]
impl UserStore for PostgresStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&new.username)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    MarketError::Validation(
                        "username: A user with that username already exists.".into(),
                    )
                } else {
                    e.into()
                }
            })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }
}
// endregion: --- User Store

// region:    --- Catalog Store
#[async_trait]
impl CatalogStore for PostgresStore {
    async fn insert_product(
        &self,
        owner_id: i64,
        new: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        Ok(sqlx::query_as::<_, Product>(queries::INSERT_PRODUCT)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.price)
            .bind(new.stock)
            .bind(new.is_active)
            .bind(new.rating)
            .bind(owner_id)
            .bind(now)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        Ok(sqlx::query_as::<_, Product>(queries::GET_PRODUCT)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let query = match filter {
            ProductFilter::All => sqlx::query_as::<_, Product>(queries::GET_ALL_PRODUCTS),
            ProductFilter::Owner(owner_id) => {
                sqlx::query_as::<_, Product>(queries::GET_OWNER_PRODUCTS).bind(owner_id)
            }
        };
        Ok(query.fetch_all(self.db.pool()).await?)
    }

    async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        let mut tx = self.db.pool().begin().await?;
        let mut product = sqlx::query_as::<_, Product>(&format!("{} FOR UPDATE", queries::GET_PRODUCT))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| MarketError::not_found("Product"))?;
        patch.apply(&mut product);

        let product = sqlx::query_as::<_, Product>(queries::UPDATE_PRODUCT)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock)
            .bind(product.is_active)
            .bind(product.rating)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        let result = sqlx::query(queries::DELETE_PRODUCT)
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(MarketError::not_found("Product"));
        }
        Ok(())
    }
}
// endregion: --- Catalog Store

// region:    --- Auction Store
#[async_trait]
impl AuctionStore for PostgresStore {
    async fn insert_product_with_auction(
        &self,
        owner_id: i64,
        product: NewProduct,
        auction: NewAuction,
        now: DateTime<Utc>,
    ) -> Result<(Product, Auction)> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let product = sqlx::query_as::<_, Product>(queries::INSERT_PRODUCT)
                        .bind(&product.name)
                        .bind(&product.description)
                        .bind(product.price)
                        .bind(product.stock)
                        .bind(product.is_active)
                        .bind(product.rating)
                        .bind(owner_id)
                        .bind(now)
                        .fetch_one(&mut **tx)
                        .await?;

                    let auction = sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION)
                        .bind(product.id)
                        .bind(auction.start_price)
                        .bind(auction.start_time)
                        .bind(auction.end_time)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, MarketError>((product, auction))
                })
            })
            .await
    }

    async fn get_auction_view(&self, id: i64) -> Result<Option<AuctionView>> {
        Ok(sqlx::query_as::<_, AuctionView>(&queries::get_auction_view())
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn auction_for_product(&self, product_id: i64) -> Result<Option<AuctionView>> {
        Ok(
            sqlx::query_as::<_, AuctionView>(&queries::get_product_auction_view())
                .bind(product_id)
                .fetch_optional(self.db.pool())
                .await?,
        )
    }

    async fn list_active_auctions(&self) -> Result<Vec<AuctionView>> {
        Ok(
            sqlx::query_as::<_, AuctionView>(&queries::get_active_auction_views())
                .fetch_all(self.db.pool())
                .await?,
        )
    }

    async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(queries::EXPIRE_DUE_AUCTIONS)
            .bind(now)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn modify_auction(&self, id: i64, mutation: AuctionMutation) -> Result<AuctionView> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(queries::LOCK_AUCTION)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| MarketError::not_found("Auction"))?;
        let owner_id: i64 = row.try_get("owner_id")?;
        let mut auction = Auction::from_row(&row)?;
        let before = auction.clone();

        let outcome = mutation(&mut auction, owner_id);

        if auction != before {
            sqlx::query(queries::UPDATE_AUCTION_STATE)
                .bind(auction.id)
                .bind(auction.current_price)
                .bind(auction.highest_bidder_id)
                .bind(auction.is_active)
                .execute(&mut *tx)
                .await?;
        }

        if let Ok(Some(reservation)) = &outcome {
            let cart = sqlx::query_as::<_, Cart>(queries::UPSERT_CART)
                .bind(reservation.user_id)
                .fetch_one(&mut *tx)
                .await?;
            let item = sqlx::query_as::<_, CartItem>(queries::UPSERT_CART_ITEM)
                .bind(cart.id)
                .bind(reservation.product_id)
                .bind(reservation.quantity)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_quantity_error)?;
            info!(
                "{:<12} --> 장바구니 예약: cart {} product {} quantity {}",
                "Store", cart.id, item.product_id, item.quantity
            );
        }

        // 응답 뷰도 잠금 구간 안에서 읽음
        let view = match &outcome {
            Ok(_) => {
                sqlx::query_as::<_, AuctionView>(&queries::get_auction_view())
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            Err(_) => None,
        };

        tx.commit().await?;
        outcome?;
        view.ok_or_else(|| MarketError::not_found("Auction"))
    }
}
// endregion: --- Auction Store

// region:    --- Cart Store
#[async_trait]
impl CartStore for PostgresStore {
    async fn get_or_create_cart(&self, user_id: i64) -> Result<Cart> {
        Ok(sqlx::query_as::<_, Cart>(queries::UPSERT_CART)
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_cart_items(&self, cart_id: i64) -> Result<Vec<CartItemView>> {
        Ok(sqlx::query_as::<_, CartItemView>(queries::GET_CART_ITEMS)
            .bind(cart_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn add_or_increment(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem> {
        let exists: bool = sqlx::query_scalar(queries::PRODUCT_EXISTS)
            .bind(product_id)
            .fetch_one(self.db.pool())
            .await?;
        if !exists {
            return Err(MarketError::not_found("Product"));
        }
        sqlx::query_as::<_, CartItem>(queries::UPSERT_CART_ITEM)
            .bind(cart_id)
            .bind(product_id)
            .bind(quantity)
            .fetch_one(self.db.pool())
            .await
            .map_err(map_quantity_error)
    }

    async fn set_quantity(&self, cart_id: i64, product_id: i64, quantity: i32) -> Result<CartItem> {
        sqlx::query_as::<_, CartItem>(queries::SET_CART_ITEM_QUANTITY)
            .bind(cart_id)
            .bind(product_id)
            .bind(quantity)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| MarketError::not_found("Cart item"))
    }

    async fn remove_item(&self, cart_id: i64, product_id: i64) -> Result<()> {
        let result = sqlx::query(queries::DELETE_CART_ITEM)
            .bind(cart_id)
            .bind(product_id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(MarketError::not_found("Cart item"));
        }
        Ok(())
    }
}
// endregion: --- Cart Store
