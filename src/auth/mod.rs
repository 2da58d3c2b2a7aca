//! 인증
//!
//! 요청마다 Bearer 토큰을 검증해 [`Principal`] 을 만들고, 모든 도메인 연산에
//! 명시적인 인자로 전달한다.
// region:    --- Imports
use crate::error::MarketError;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use std::sync::Arc;

pub mod jwt;
pub mod password;
pub mod user;

pub use jwt::{TokenPair, TokenService, TokenType};
// endregion: --- Imports

/// 인증된 사용자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let token = extract_bearer(&parts.headers)?;
        let claims = tokens.verify(token, TokenType::Access)?;
        Ok(Principal {
            user_id: claims.user_id()?,
            username: claims.username,
        })
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, MarketError> {
    let missing = || MarketError::Unauthorized("Authentication credentials were not provided.".into());

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(missing)?
        .to_str()
        .map_err(|_| missing())?;
    let token = value.strip_prefix("Bearer ").ok_or_else(missing)?.trim();
    if token.is_empty() {
        return Err(missing());
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_required() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def");
    }
}
