// region:    --- Imports
use crate::auth::TokenService;
use crate::error::MarketError;
use crate::store::MarketStore;
use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRef, FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use std::sync::Arc;

pub mod auctions;
pub mod cart;
pub mod products;
pub mod users;
// endregion: --- Imports

// region:    --- App State
/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}
// endregion: --- App State

// region:    --- Json Body
/// JSON 본문 추출기. 파싱 실패도 `{"error": ...}` 형식으로 응답한다.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| MarketError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
// endregion: --- Json Body

// region:    --- Path Param
/// 경로 파라미터 추출기. 숫자가 아닌 id 도 `{"error": ...}` 형식으로 응답한다.
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| MarketError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
// endregion: --- Path Param
