use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 장바구니 모델 (사용자당 1개)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

// 장바구니 항목 모델 ((cart, product) 당 1개)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    #[serde(rename = "cart")]
    pub cart_id: i64,
    #[serde(rename = "product")]
    pub product_id: i64,
    pub quantity: i32,
}

/// 장바구니 항목 응답 (상품 정보 포함)
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CartItemView {
    pub id: i64,
    #[serde(rename = "cart")]
    pub cart_id: i64,
    #[serde(rename = "product")]
    pub product_id: i64,
    pub quantity: i32,
    pub product_name: String,
    pub product_description: String,
    pub product_price: Decimal,
}

/// 낙찰 선두 입찰자의 장바구니 예약
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartReservation {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

// region:    --- Requests

/// 장바구니 추가 요청
#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: i64,
    pub quantity: Option<i32>,
}

/// 장바구니 수량 변경 요청
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub product_id: i64,
    pub quantity: i32,
}

/// 장바구니 삭제 요청
#[derive(Debug, Deserialize)]
pub struct RemoveCartItemRequest {
    pub product_id: i64,
}

// endregion: --- Requests
