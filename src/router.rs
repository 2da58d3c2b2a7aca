// region:    --- Imports
use crate::handlers::{auctions, cart, products, users, AppState};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
// endregion: --- Imports

/// 라우터 설정
pub fn build_router(state: AppState) -> Router {
    // 프론트엔드를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(users::handle_get_routes))
        .route("/register/", post(users::handle_register))
        .route("/token/", post(users::handle_obtain_token))
        .route("/token/refresh/", post(users::handle_refresh_token))
        .route("/products/", get(products::handle_list_products))
        .route("/products/create/", post(products::handle_create_product))
        .route(
            "/products/auctions/",
            get(auctions::handle_list_auctions).post(auctions::handle_create_auction),
        )
        .route(
            "/products/auctions/:id/",
            get(auctions::handle_get_auction)
                .put(auctions::handle_bid)
                .patch(auctions::handle_deactivate_auction),
        )
        .route("/products/:id/", get(products::handle_get_product))
        .route("/products/:id/edit/", put(products::handle_edit_product))
        .route(
            "/products/:id/delete/",
            delete(products::handle_delete_product),
        )
        .route(
            "/cart/",
            get(cart::handle_get_cart)
                .post(cart::handle_add_to_cart)
                .put(cart::handle_update_cart)
                .delete(cart::handle_remove_from_cart),
        )
        .route("/user/creations/", get(users::handle_user_creations))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
