// region:    --- Imports
use super::{AppState, JsonBody};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::user::{NewUser, RefreshRequest, RegisterRequest, TokenRequest, UserView};
use crate::auth::{Principal, TokenPair, TokenType};
use crate::catalog::commands;
use crate::catalog::model::CreationView;
use crate::error::{MarketError, Result};
use crate::store::UserStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
// endregion: --- Imports

/// 해시 계산은 블로킹 스레드에서 실행
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| MarketError::Internal(format!("blocking task failed: {e}")))
}

/// 라우트 안내
pub async fn handle_get_routes() -> Json<Value> {
    Json(json!(["/token/", "/token/refresh/"]))
}

/// 회원가입
pub async fn handle_register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>)> {
    req.validate()?;
    info!("{:<12} --> 회원가입 요청: {}", "Auth", req.username);
    let password = req.password;
    let password_hash = blocking(move || hash_password(&password)).await??;
    let user = state
        .store
        .create_user(NewUser {
            username: req.username.trim().to_string(),
            email: req.email,
            password_hash,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 토큰 발급
pub async fn handle_obtain_token(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TokenRequest>,
) -> Result<Json<TokenPair>> {
    let invalid = || MarketError::Unauthorized("No active account found with the given credentials".into());

    let user = state
        .store
        .find_user_by_username(&req.username)
        .await?
        .ok_or_else(invalid)?;
    let (password, stored) = (req.password.clone(), user.password_hash.clone());
    if !blocking(move || verify_password(&password, &stored)).await? {
        info!("{:<12} --> 로그인 실패: {}", "Auth", req.username);
        return Err(invalid());
    }
    info!("{:<12} --> 토큰 발급: user {}", "Auth", user.id);
    Ok(Json(state.tokens.issue_pair(user.id, &user.username)?))
}

/// 액세스 토큰 재발급
pub async fn handle_refresh_token(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> Result<Json<Value>> {
    let claims = state.tokens.verify(&req.refresh, TokenType::Refresh)?;
    let user_id = claims.user_id()?;
    let access = state
        .tokens
        .issue(user_id, &claims.username, TokenType::Access)?;
    Ok(Json(json!({ "access": access })))
}

/// 내가 등록한 상품 (경매 정보 포함, 최신순)
pub async fn handle_user_creations(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<CreationView>>> {
    info!("{:<12} --> 등록 상품 조회 user: {}", "Handler", principal.user_id);
    let creations =
        commands::list_user_creations(state.store.as_ref(), &principal, Utc::now()).await?;
    Ok(Json(creations))
}
