use crate::catalog::model::{CreateProductRequest, NewProduct, ProductView};
use crate::error::{MarketError, Result};
use crate::money;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 경매 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub product_id: i64,
    pub start_price: Decimal,
    pub current_price: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub highest_bidder_id: Option<i64>,
}

/// 경매 응답 (상품명, 소유자, 최고 입찰자 정보 포함)
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AuctionView {
    pub id: i64,
    #[serde(rename = "product")]
    pub product_id: i64,
    pub product_name: String,
    #[serde(rename = "owner")]
    pub owner_username: String,
    pub owner_id: i64,
    #[serde(rename = "highest_bidder")]
    pub highest_bidder_id: Option<i64>,
    pub highest_bidder_username: Option<String>,
    pub start_price: Decimal,
    pub current_price: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
}

impl AuctionView {
    pub fn new(
        auction: Auction,
        product_name: String,
        owner_id: i64,
        owner_username: String,
        highest_bidder_username: Option<String>,
    ) -> Self {
        Self {
            id: auction.id,
            product_id: auction.product_id,
            product_name,
            owner_username,
            owner_id,
            highest_bidder_id: auction.highest_bidder_id,
            highest_bidder_username,
            start_price: auction.start_price,
            current_price: auction.current_price,
            start_time: auction.start_time,
            end_time: auction.end_time,
            is_active: auction.is_active,
        }
    }
}

/// 경매 상품 생성 결과
#[derive(Debug, Clone, Serialize)]
pub struct AuctionCreated {
    pub product: ProductView,
    pub auction: AuctionView,
}

/// 검증이 끝난 신규 경매 필드
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub start_price: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// region:    --- Requests

/// 경매 상품 생성 요청
#[derive(Debug, Deserialize)]
pub struct CreateAuctionRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    pub rating: Option<Decimal>,
    pub start_price: Option<Decimal>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl CreateAuctionRequest {
    /// 상품 필드와 경매 필드를 모두 검증
    pub fn validate(self, now: DateTime<Utc>) -> Result<(NewProduct, NewAuction)> {
        let product = CreateProductRequest {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            is_active: self.is_active,
            rating: self.rating,
        }
        .validate()?;

        let start_price = self
            .start_price
            .ok_or_else(|| MarketError::Validation("start_price: This field is required.".into()))?;
        let start_price = money::price(start_price).ok_or_else(|| {
            MarketError::Validation(
                "start_price: Ensure a non-negative amount with at most 10 digits and 2 decimal places."
                    .into(),
            )
        })?;

        let end_time = self
            .end_time
            .ok_or_else(|| MarketError::Validation("end_time: This field is required.".into()))?;
        let end_time = parse_timestamp(&end_time).ok_or_else(|| {
            MarketError::Validation("end_time: Datetime has wrong format.".into())
        })?;

        let start_time = match self.start_time {
            Some(raw) => parse_timestamp(&raw).ok_or_else(|| {
                MarketError::Validation("start_time: Datetime has wrong format.".into())
            })?,
            None => now,
        };

        Ok((
            product,
            NewAuction {
                start_price,
                start_time,
                end_time,
            },
        ))
    }
}

/// 입찰 요청
#[derive(Debug, Default, Deserialize)]
pub struct BidRequest {
    pub bid: Option<serde_json::Value>,
}

// endregion: --- Requests

/// RFC 3339 또는 UTC 기준 naive 형식(`YYYY-MM-DDTHH:MM[:SS]`) 파싱
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
