//! 메모리 저장소
//!
//! DATABASE_URL 없이 실행하는 개발 모드와 테스트에서 사용한다.
//! 모든 변경은 하나의 비동기 뮤텍스로 직렬화된다.
// region:    --- Imports
use super::{AuctionMutation, AuctionStore, CartStore, CatalogStore, UserStore};
use crate::auction::model::{Auction, AuctionView, NewAuction};
use crate::auth::user::{NewUser, User};
use crate::cart::model::{Cart, CartItem, CartItemView};
use crate::catalog::model::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;
// endregion: --- Imports

#[derive(Default)]
struct State {
    last_id: i64,
    users: BTreeMap<i64, User>,
    products: BTreeMap<i64, Product>,
    auctions: BTreeMap<i64, Auction>,
    carts: BTreeMap<i64, Cart>,
    cart_items: BTreeMap<i64, CartItem>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username(&self, user_id: i64) -> Option<String> {
        self.users.get(&user_id).map(|u| u.username.clone())
    }

    fn view(&self, auction: &Auction) -> Result<AuctionView> {
        let product = self.products.get(&auction.product_id).ok_or_else(|| {
            MarketError::Internal(format!("auction {} has no product", auction.id))
        })?;
        let owner_username = self.username(product.owner_id).unwrap_or_default();
        let bidder_username = auction.highest_bidder_id.and_then(|id| self.username(id));
        Ok(AuctionView::new(
            auction.clone(),
            product.name.clone(),
            product.owner_id,
            owner_username,
            bidder_username,
        ))
    }

    fn cart_for(&mut self, user_id: i64) -> Cart {
        if let Some(cart) = self.carts.values().find(|c| c.user_id == user_id) {
            return cart.clone();
        }
        let cart = Cart {
            id: self.next_id(),
            user_id,
            created_at: Utc::now(),
        };
        self.carts.insert(cart.id, cart.clone());
        cart
    }

    fn find_item_mut(&mut self, cart_id: i64, product_id: i64) -> Option<&mut CartItem> {
        self.cart_items
            .values_mut()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
    }

    fn add_or_increment(
        &mut self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem> {
        if let Some(item) = self.find_item_mut(cart_id, product_id) {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(MarketError::quantity_out_of_range)?;
            return Ok(item.clone());
        }
        let item = CartItem {
            id: self.next_id(),
            cart_id,
            product_id,
            quantity,
        };
        self.cart_items.insert(item.id, item.clone());
        Ok(item)
    }
}

/// 메모리 저장소
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// region:    --- User Store
#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == new.username) {
            return Err(MarketError::Validation(
                "username: A user with that username already exists.".into(),
            ));
        }
        let user = User {
            id: state.next_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }
}
// endregion: --- User Store

// region:    --- Catalog Store
fn new_product_row(id: i64, owner_id: i64, new: NewProduct, now: DateTime<Utc>) -> Product {
    Product {
        id,
        name: new.name,
        description: new.description,
        price: new.price,
        stock: new.stock,
        is_active: new.is_active,
        rating: new.rating,
        owner_id,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_product(
        &self,
        owner_id: i64,
        new: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let product = new_product_row(id, owner_id, new, now);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| match filter {
                ProductFilter::All => true,
                ProductFilter::Owner(owner_id) => p.owner_id == owner_id,
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(products)
    }

    async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        let mut state = self.state.lock().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("Product"))?;
        patch.apply(product);
        product.updated_at = now;
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.products.remove(&id).is_none() {
            return Err(MarketError::not_found("Product"));
        }
        state.auctions.retain(|_, a| a.product_id != id);
        state.cart_items.retain(|_, i| i.product_id != id);
        Ok(())
    }
}
// endregion: --- Catalog Store

// region:    --- Auction Store
#[async_trait]
impl AuctionStore for MemoryStore {
    async fn insert_product_with_auction(
        &self,
        owner_id: i64,
        product: NewProduct,
        auction: NewAuction,
        now: DateTime<Utc>,
    ) -> Result<(Product, Auction)> {
        let mut state = self.state.lock().await;
        let product_id = state.next_id();
        let product = new_product_row(product_id, owner_id, product, now);
        let auction = Auction {
            id: state.next_id(),
            product_id,
            start_price: auction.start_price,
            current_price: auction.start_price,
            start_time: auction.start_time,
            end_time: auction.end_time,
            is_active: true,
            highest_bidder_id: None,
        };
        state.products.insert(product.id, product.clone());
        state.auctions.insert(auction.id, auction.clone());
        Ok((product, auction))
    }

    async fn get_auction_view(&self, id: i64) -> Result<Option<AuctionView>> {
        let state = self.state.lock().await;
        state.auctions.get(&id).map(|a| state.view(a)).transpose()
    }

    async fn auction_for_product(&self, product_id: i64) -> Result<Option<AuctionView>> {
        let state = self.state.lock().await;
        state
            .auctions
            .values()
            .find(|a| a.product_id == product_id)
            .map(|a| state.view(a))
            .transpose()
    }

    async fn list_active_auctions(&self) -> Result<Vec<AuctionView>> {
        let state = self.state.lock().await;
        state
            .auctions
            .values()
            .filter(|a| a.is_active)
            .map(|a| state.view(a))
            .collect()
    }

    async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut state = self.state.lock().await;
        let expired = state
            .auctions
            .values_mut()
            .map(|a| a.expire_if_due(now))
            .filter(|expired| *expired)
            .count();
        Ok(expired as u64)
    }

    async fn modify_auction(&self, id: i64, mutation: AuctionMutation) -> Result<AuctionView> {
        let mut state = self.state.lock().await;
        let mut auction = state
            .auctions
            .get(&id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("Auction"))?;
        let owner_id = state
            .products
            .get(&auction.product_id)
            .map(|p| p.owner_id)
            .ok_or_else(|| MarketError::not_found("Product"))?;

        let reservation = match mutation(&mut auction, owner_id) {
            Ok(reservation) => reservation,
            Err(e) => {
                // 거절되어도 지연 만료는 저장
                state.auctions.insert(id, auction);
                return Err(e);
            }
        };

        // 예약이 실패하면 경매 변경도 반영하지 않음
        if let Some(reservation) = reservation {
            let cart = state.cart_for(reservation.user_id);
            let item =
                state.add_or_increment(cart.id, reservation.product_id, reservation.quantity)?;
            debug!(
                "{:<12} --> 장바구니 예약: cart {} product {} quantity {}",
                "Store", cart.id, item.product_id, item.quantity
            );
        }
        state.auctions.insert(id, auction.clone());
        state.view(&auction)
    }
}
// endregion: --- Auction Store

// region:    --- Cart Store
#[async_trait]
impl CartStore for MemoryStore {
    async fn get_or_create_cart(&self, user_id: i64) -> Result<Cart> {
        Ok(self.state.lock().await.cart_for(user_id))
    }

    async fn list_cart_items(&self, cart_id: i64) -> Result<Vec<CartItemView>> {
        let state = self.state.lock().await;
        Ok(state
            .cart_items
            .values()
            .filter(|i| i.cart_id == cart_id)
            .filter_map(|i| {
                let product = state.products.get(&i.product_id)?;
                Some(CartItemView {
                    id: i.id,
                    cart_id: i.cart_id,
                    product_id: i.product_id,
                    quantity: i.quantity,
                    product_name: product.name.clone(),
                    product_description: product.description.clone(),
                    product_price: product.price,
                })
            })
            .collect())
    }

    async fn add_or_increment(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&product_id) {
            return Err(MarketError::not_found("Product"));
        }
        state.add_or_increment(cart_id, product_id, quantity)
    }

    async fn set_quantity(&self, cart_id: i64, product_id: i64, quantity: i32) -> Result<CartItem> {
        let mut state = self.state.lock().await;
        let item = state
            .find_item_mut(cart_id, product_id)
            .ok_or_else(|| MarketError::not_found("Cart item"))?;
        item.quantity = quantity;
        Ok(item.clone())
    }

    async fn remove_item(&self, cart_id: i64, product_id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        let id = state
            .find_item_mut(cart_id, product_id)
            .map(|i| i.id)
            .ok_or_else(|| MarketError::not_found("Cart item"))?;
        state.cart_items.remove(&id);
        Ok(())
    }
}
// endregion: --- Cart Store
