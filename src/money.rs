//! 고정 소수점 금액 처리
//!
//! 가격은 최대 10자리, 소수점 이하 2자리(NUMERIC(10, 2))로 저장된다.
//! 평점은 최대 3자리, 소수점 이하 2자리(NUMERIC(3, 2))다.
use rust_decimal::Decimal;
use std::str::FromStr;

pub const PRICE_DIGITS: u32 = 10;
pub const RATING_DIGITS: u32 = 3;
pub const SCALE: u32 = 2;

/// 자릿수 제약에 맞춰 소수점 2자리로 고정
pub fn fit(value: Decimal, max_digits: u32, scale: u32) -> Option<Decimal> {
    let mut value = value.normalize();
    if value.scale() > scale {
        return None;
    }
    value.rescale(scale);

    let limit = Decimal::from(10u64.pow(max_digits - scale));
    if value.abs() >= limit {
        return None;
    }
    Some(value)
}

/// 가격 필드 검증 (0 이상)
pub fn price(value: Decimal) -> Option<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    fit(value, PRICE_DIGITS, SCALE)
}

/// 입찰 금액 파싱 (0보다 큰 금액만 허용)
pub fn parse_bid_amount(raw: &str) -> Option<Decimal> {
    let value = Decimal::from_str(raw.trim()).ok()?;
    if value <= Decimal::ZERO {
        return None;
    }
    fit(value, PRICE_DIGITS, SCALE)
}

/// JSON 값(문자열 또는 숫자)을 입찰 금액 원문으로 변환
pub fn raw_amount(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
