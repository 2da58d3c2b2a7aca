//! 저장소 계층
//!
//! 도메인 규칙은 `auction::engine` 과 각 `commands` 모듈에 있고, 저장소는
//! 영속화와 직렬화(경매 행 단위 단일 기록자)만 책임진다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionView, NewAuction};
use crate::auth::user::{NewUser, User};
use crate::cart::model::{Cart, CartItem, CartItemView, CartReservation};
use crate::catalog::model::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
// endregion: --- Imports

/// 경매 행 잠금 구간 안에서 실행되는 상태 변경
///
/// 인자는 (경매, 상품 소유자 id). `Ok(Some(..))` 이면 같은 트랜잭션에서 장바구니
/// 예약을 기록한다. 오류를 반환해도 경매 상태 변경(지연 만료)은 저장된다.
pub type AuctionMutation =
    Box<dyn FnOnce(&mut Auction, i64) -> Result<Option<CartReservation>> + Send>;

// region:    --- Store Traits

/// 사용자 저장소
#[async_trait]
pub trait UserStore {
    async fn create_user(&self, new: NewUser) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
}

/// 상품 저장소
#[async_trait]
pub trait CatalogStore {
    async fn insert_product(
        &self,
        owner_id: i64,
        new: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product>;
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;
    /// 최신 등록순
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>>;
    async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product>;
    /// 경매와 장바구니 항목까지 함께 삭제
    async fn delete_product(&self, id: i64) -> Result<()>;
}

/// 경매 저장소
#[async_trait]
pub trait AuctionStore {
    /// 상품과 경매를 하나의 트랜잭션으로 생성 (둘 다 생성되거나 둘 다 생성되지 않음)
    async fn insert_product_with_auction(
        &self,
        owner_id: i64,
        product: NewProduct,
        auction: NewAuction,
        now: DateTime<Utc>,
    ) -> Result<(Product, Auction)>;
    async fn get_auction_view(&self, id: i64) -> Result<Option<AuctionView>>;
    async fn auction_for_product(&self, product_id: i64) -> Result<Option<AuctionView>>;
    async fn list_active_auctions(&self) -> Result<Vec<AuctionView>>;
    /// 종료 시간이 지난 활성 경매를 일괄 종료, 전환된 개수 반환
    async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64>;
    /// 경매 행을 잠근 상태에서 상태 변경 실행 후 최신 뷰 반환
    async fn modify_auction(&self, id: i64, mutation: AuctionMutation) -> Result<AuctionView>;
}

/// 장바구니 저장소
#[async_trait]
pub trait CartStore {
    async fn get_or_create_cart(&self, user_id: i64) -> Result<Cart>;
    async fn list_cart_items(&self, cart_id: i64) -> Result<Vec<CartItemView>>;
    async fn add_or_increment(&self, cart_id: i64, product_id: i64, quantity: i32)
        -> Result<CartItem>;
    async fn set_quantity(&self, cart_id: i64, product_id: i64, quantity: i32) -> Result<CartItem>;
    async fn remove_item(&self, cart_id: i64, product_id: i64) -> Result<()>;
}

/// 서비스 전체 저장소
pub trait MarketStore: UserStore + CatalogStore + AuctionStore + CartStore + Send + Sync {}

impl<T> MarketStore for T where T: UserStore + CatalogStore + AuctionStore + CartStore + Send + Sync {}

// endregion: --- Store Traits
