/// 스키마 (CREATE ... IF NOT EXISTS)
pub const SCHEMA: &str = include_str!("../sql/01-create-schema.sql");

// region:    --- Users

/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, password_hash, created_at
"#;

/// 사용자명으로 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 사용자 조회
pub const GET_USER: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1";

// endregion: --- Users

// region:    --- Products

/// 상품 생성
pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (name, description, price, stock, is_active, rating, owner_id, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
    RETURNING id, name, description, price, stock, is_active, rating, owner_id, created_at, updated_at
"#;

/// 상품 조회
pub const GET_PRODUCT: &str = "SELECT id, name, description, price, stock, is_active, rating, owner_id, created_at, updated_at FROM products WHERE id = $1";

/// 모든 상품 조회
pub const GET_ALL_PRODUCTS: &str = "SELECT id, name, description, price, stock, is_active, rating, owner_id, created_at, updated_at FROM products ORDER BY created_at DESC, id DESC";

/// 소유자 상품 조회
pub const GET_OWNER_PRODUCTS: &str = "SELECT id, name, description, price, stock, is_active, rating, owner_id, created_at, updated_at FROM products WHERE owner_id = $1 ORDER BY created_at DESC, id DESC";

/// 상품 수정
pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products
    SET name = $2, description = $3, price = $4, stock = $5, is_active = $6, rating = $7, updated_at = $8
    WHERE id = $1
    RETURNING id, name, description, price, stock, is_active, rating, owner_id, created_at, updated_at
"#;

/// 상품 삭제 (경매, 장바구니 항목은 FK CASCADE)
pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

// endregion: --- Products

// region:    --- Auctions

/// 경매 생성
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (product_id, start_price, current_price, start_time, end_time, is_active)
    VALUES ($1, $2, $2, $3, $4, TRUE)
    RETURNING id, product_id, start_price, current_price, start_time, end_time, is_active, highest_bidder_id
"#;

const AUCTION_VIEW_SELECT: &str = r#"
    SELECT a.id, a.product_id, p.name AS product_name, o.username AS owner_username, p.owner_id,
           a.highest_bidder_id, b.username AS highest_bidder_username,
           a.start_price, a.current_price, a.start_time, a.end_time, a.is_active
    FROM auctions a
    JOIN products p ON p.id = a.product_id
    JOIN users o ON o.id = p.owner_id
    LEFT JOIN users b ON b.id = a.highest_bidder_id
"#;

/// 경매 뷰 조회
pub fn get_auction_view() -> String {
    format!("{AUCTION_VIEW_SELECT} WHERE a.id = $1")
}

/// 상품의 경매 뷰 조회
pub fn get_product_auction_view() -> String {
    format!("{AUCTION_VIEW_SELECT} WHERE a.product_id = $1")
}

/// 활성 경매 목록 조회
pub fn get_active_auction_views() -> String {
    format!("{AUCTION_VIEW_SELECT} WHERE a.is_active ORDER BY a.end_time ASC, a.id ASC")
}

/// 경매 행 잠금 조회 (입찰/비활성화 직렬화)
pub const LOCK_AUCTION: &str = r#"
    SELECT a.id, a.product_id, a.start_price, a.current_price, a.start_time, a.end_time,
           a.is_active, a.highest_bidder_id, p.owner_id
    FROM auctions a
    JOIN products p ON p.id = a.product_id
    WHERE a.id = $1
    FOR UPDATE OF a
"#;

/// 경매 상태 저장
pub const UPDATE_AUCTION_STATE: &str = r#"
    UPDATE auctions SET current_price = $2, highest_bidder_id = $3, is_active = $4
    WHERE id = $1
"#;

/// 종료 시간이 지난 경매 일괄 종료
pub const EXPIRE_DUE_AUCTIONS: &str =
    "UPDATE auctions SET is_active = FALSE WHERE is_active AND end_time <= $1";

// endregion: --- Auctions

// region:    --- Carts

/// 장바구니 조회 또는 생성
pub const UPSERT_CART: &str = r#"
    INSERT INTO carts (user_id) VALUES ($1)
    ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
    RETURNING id, user_id, created_at
"#;

/// 장바구니 항목 목록
pub const GET_CART_ITEMS: &str = r#"
    SELECT i.id, i.cart_id, i.product_id, i.quantity,
           p.name AS product_name, p.description AS product_description, p.price AS product_price
    FROM cart_items i
    JOIN products p ON p.id = i.product_id
    WHERE i.cart_id = $1
    ORDER BY i.id
"#;

/// 장바구니 항목 추가 또는 수량 증가
pub const UPSERT_CART_ITEM: &str = r#"
    INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3)
    ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
    RETURNING id, cart_id, product_id, quantity
"#;

/// 장바구니 항목 수량 변경
pub const SET_CART_ITEM_QUANTITY: &str = r#"
    UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2
    RETURNING id, cart_id, product_id, quantity
"#;

/// 장바구니 항목 삭제
pub const DELETE_CART_ITEM: &str = "DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2";

/// 상품 존재 여부
pub const PRODUCT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)";

// endregion: --- Carts
