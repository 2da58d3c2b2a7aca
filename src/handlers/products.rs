// region:    --- Imports
use super::{AppState, JsonBody, PathParam};
use crate::auth::Principal;
use crate::catalog::commands;
use crate::catalog::model::{CreateProductRequest, ProductView, UpdateProductRequest};
use crate::error::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
// endregion: --- Imports

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    #[serde(default)]
    pub all: bool,
}

/// 상품 목록
pub async fn handle_list_products(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<Vec<ProductView>>> {
    info!("{:<12} --> 상품 목록 조회 all: {}", "Handler", params.all);
    let products =
        commands::list_products(state.store.as_ref(), &principal, params.all, Utc::now()).await?;
    Ok(Json(products))
}

/// 상품 조회
pub async fn handle_get_product(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ProductView>> {
    info!("{:<12} --> 상품 조회 id: {}", "Handler", id);
    let product = commands::get_product(state.store.as_ref(), &principal, id, Utc::now()).await?;
    Ok(Json(product))
}

/// 상품 생성
pub async fn handle_create_product(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(req): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductView>)> {
    info!("{:<12} --> 상품 생성 요청", "Handler");
    let product =
        commands::create_product(state.store.as_ref(), &principal, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// 상품 수정
pub async fn handle_edit_product(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<UpdateProductRequest>,
) -> Result<Json<ProductView>> {
    info!("{:<12} --> 상품 수정 요청 id: {}", "Handler", id);
    let product =
        commands::update_product(state.store.as_ref(), &principal, id, req, Utc::now()).await?;
    Ok(Json(product))
}

/// 상품 삭제
pub async fn handle_delete_product(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    info!("{:<12} --> 상품 삭제 요청 id: {}", "Handler", id);
    commands::delete_product(state.store.as_ref(), &principal, id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
