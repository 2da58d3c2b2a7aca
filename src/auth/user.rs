use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 사용자 모델
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// 사용자 응답 (비밀번호 제외)
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// 회원가입 요청
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(MarketError::Validation("username: This field may not be blank.".into()));
        }
        if self.username.chars().count() > 150 {
            return Err(MarketError::Validation(
                "username: Ensure this field has no more than 150 characters.".into(),
            ));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(MarketError::Validation("email: Enter a valid email address.".into()));
        }
        if self.password.is_empty() {
            return Err(MarketError::Validation("password: This field may not be blank.".into()));
        }
        Ok(())
    }
}

/// 토큰 발급 요청
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// 토큰 재발급 요청
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: String,
}
