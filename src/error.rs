// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;
// endregion: --- Imports

pub type Result<T> = std::result::Result<T, MarketError>;

// region:    --- Market Error
/// 도메인 오류
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    /// 경매 비활성화 권한 없음 (기존 클라이언트 호환을 위해 400 유지)
    #[error("Only the product owner can deactivate this auction")]
    NotAuctionOwner,

    #[error("{0}")]
    Validation(String),

    #[error("Auction has ended")]
    AuctionEnded,

    #[error("Invalid bid amount")]
    InvalidBid,

    #[error("Bid must be higher than the current price")]
    BidTooLow,

    #[error("You cannot bid on your own auction")]
    SelfBid,

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl MarketError {
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    /// 장바구니 수량이 i32 범위를 넘는 경우
    pub fn quantity_out_of_range() -> Self {
        Self::Validation(format!(
            "quantity: Ensure this value is less than or equal to {}.",
            i32::MAX
        ))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotAuctionOwner
            | Self::Validation(_)
            | Self::AuctionEnded
            | Self::InvalidBid
            | Self::BidTooLow
            | Self::SelfBid => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(e) => {
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Error", e);
                "Internal server error".to_string()
            }
            Self::Internal(msg) => {
                error!("{:<12} --> 내부 오류: {}", "Error", msg);
                msg.clone()
            }
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
// endregion: --- Market Error
