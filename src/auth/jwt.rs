// region:    --- Imports
use crate::error::{MarketError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
// endregion: --- Imports

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| MarketError::Unauthorized("Token contained no recognizable user identification".into()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT 발급 및 검증 (HS256)
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue(&self, user_id: i64, username: &str, token_type: TokenType) -> Result<String> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            token_type,
            exp: (Utc::now() + ttl).timestamp().max(0) as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| MarketError::Internal(format!("failed to sign token: {e}")))
    }

    pub fn issue_pair(&self, user_id: i64, username: &str) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, username, TokenType::Access)?,
            refresh: self.issue(user_id, username, TokenType::Refresh)?,
        })
    }

    /// 서명, 만료, 토큰 종류 검증
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| MarketError::Unauthorized("Given token not valid for any token type".into()))?;
        if claims.token_type != expected {
            return Err(MarketError::Unauthorized("Token has wrong type".into()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::minutes(5), Duration::days(1))
    }

    #[test]
    fn access_token_round_trips_principal() {
        let tokens = service();
        let pair = tokens.issue_pair(42, "alice").unwrap();

        let claims = tokens.verify(&pair.access, TokenType::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn token_types_are_not_interchangeable() {
        let tokens = service();
        let pair = tokens.issue_pair(1, "bob").unwrap();

        assert!(tokens.verify(&pair.refresh, TokenType::Access).is_err());
        assert!(tokens.verify(&pair.access, TokenType::Refresh).is_err());
        assert!(tokens.verify(&pair.refresh, TokenType::Refresh).is_ok());
    }

    #[test]
    fn expired_and_foreign_tokens_are_rejected() {
        let expired = TokenService::new(b"test-secret", Duration::minutes(-10), Duration::days(1));
        let token = expired.issue(1, "carol", TokenType::Access).unwrap();
        assert!(matches!(
            service().verify(&token, TokenType::Access),
            Err(MarketError::Unauthorized(_))
        ));

        let other = TokenService::new(b"other-secret", Duration::minutes(5), Duration::days(1));
        let token = other.issue(1, "carol", TokenType::Access).unwrap();
        assert!(service().verify(&token, TokenType::Access).is_err());
    }
}
