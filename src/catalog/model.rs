use crate::auction::model::AuctionView;
use crate::error::{MarketError, Result};
use crate::money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub rating: Decimal,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 상품 목록 조회 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    Owner(i64),
}

/// 검증이 끝난 신규 상품 필드
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub rating: Decimal,
}

/// 검증이 끝난 부분 수정 필드
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub rating: Option<Decimal>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
    }
}

// region:    --- Requests

/// 상품 생성 요청
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    pub rating: Option<Decimal>,
}

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct> {
        let name = self
            .name
            .ok_or_else(|| MarketError::Validation("name: This field is required.".into()))?;
        let price = self
            .price
            .ok_or_else(|| MarketError::Validation("price: This field is required.".into()))?;
        let stock = self
            .stock
            .ok_or_else(|| MarketError::Validation("stock: This field is required.".into()))?;

        Ok(NewProduct {
            name: validate_name(name)?,
            description: self.description,
            price: validate_price(price)?,
            stock: validate_stock(stock)?,
            is_active: self.is_active.unwrap_or(true),
            rating: validate_rating(self.rating.unwrap_or(Decimal::ZERO))?,
        })
    }
}

/// 상품 수정 요청 (부분 수정)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    pub rating: Option<Decimal>,
}

impl UpdateProductRequest {
    pub fn validate(self) -> Result<ProductPatch> {
        Ok(ProductPatch {
            name: self.name.map(validate_name).transpose()?,
            description: self.description,
            price: self.price.map(validate_price).transpose()?,
            stock: self.stock.map(validate_stock).transpose()?,
            is_active: self.is_active,
            rating: self.rating.map(validate_rating).transpose()?,
        })
    }
}

fn validate_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MarketError::Validation("name: This field may not be blank.".into()));
    }
    if trimmed.chars().count() > 255 {
        return Err(MarketError::Validation(
            "name: Ensure this field has no more than 255 characters.".into(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: Decimal) -> Result<Decimal> {
    money::price(price).ok_or_else(|| {
        MarketError::Validation(
            "price: Ensure a non-negative amount with at most 10 digits and 2 decimal places."
                .into(),
        )
    })
}

fn validate_stock(stock: i32) -> Result<i32> {
    if stock < 0 {
        return Err(MarketError::Validation("stock: Must not be negative.".into()));
    }
    Ok(stock)
}

fn validate_rating(rating: Decimal) -> Result<Decimal> {
    if rating.is_sign_negative() && !rating.is_zero() {
        return Err(MarketError::Validation("rating: Must not be negative.".into()));
    }
    money::fit(rating, money::RATING_DIGITS, money::SCALE).ok_or_else(|| {
        MarketError::Validation("rating: Ensure a value between 0 and 9.99.".into())
    })
}

// endregion: --- Requests

// region:    --- Views

/// 상품 응답 (경매 정보 포함)
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    pub rating: Decimal,
    pub owner: i64,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_auction: bool,
    pub auction: Option<AuctionView>,
}

impl ProductView {
    pub fn new(product: Product, owner_username: String, auction: Option<AuctionView>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            is_active: product.is_active,
            rating: product.rating,
            owner: product.owner_id,
            owner_username,
            created_at: product.created_at,
            updated_at: product.updated_at,
            is_auction: auction.is_some(),
            auction,
        }
    }
}

/// 사용자 등록 상품 응답
#[derive(Debug, Clone, Serialize)]
pub struct CreationView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub is_auction: bool,
    pub auction_details: Option<AuctionView>,
}

impl CreationView {
    pub fn new(product: Product, auction: Option<AuctionView>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            created_at: product.created_at,
            is_auction: auction.is_some(),
            auction_details: auction,
        }
    }
}

// endregion: --- Views

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreateProductRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_request_applies_defaults() {
        let product = request(serde_json::json!({
            "name": "  Lamp ",
            "price": "12.5",
            "stock": 3
        }))
        .validate()
        .unwrap();

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price.to_string(), "12.50");
        assert!(product.is_active);
        assert_eq!(product.rating.to_string(), "0.00");
        assert_eq!(product.description, "");
    }

    #[test]
    fn create_request_rejects_missing_and_bad_fields() {
        let missing = request(serde_json::json!({"price": "1.00", "stock": 1})).validate();
        assert!(matches!(missing, Err(MarketError::Validation(_))));

        let bad_price =
            request(serde_json::json!({"name": "x", "price": "1.001", "stock": 1})).validate();
        assert!(matches!(bad_price, Err(MarketError::Validation(_))));

        let bad_stock =
            request(serde_json::json!({"name": "x", "price": "1.00", "stock": -1})).validate();
        assert!(matches!(bad_stock, Err(MarketError::Validation(_))));

        let bad_rating = request(serde_json::json!({
            "name": "x", "price": "1.00", "stock": 1, "rating": "10"
        }))
        .validate();
        assert!(matches!(bad_rating, Err(MarketError::Validation(_))));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let now = Utc::now();
        let mut product = Product {
            id: 1,
            name: "Old".into(),
            description: "desc".into(),
            price: Decimal::new(1000, 2),
            stock: 1,
            is_active: true,
            rating: Decimal::ZERO,
            owner_id: 7,
            created_at: now,
            updated_at: now,
        };
        let patch = UpdateProductRequest {
            name: Some("New".into()),
            stock: Some(4),
            ..Default::default()
        }
        .validate()
        .unwrap();
        patch.apply(&mut product);

        assert_eq!(product.name, "New");
        assert_eq!(product.stock, 4);
        assert_eq!(product.description, "desc");
        assert_eq!(product.price, Decimal::new(1000, 2));
    }
}
