use chrono::{Duration, NaiveDateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JWT_ALGORITHM;

/// Token payload: the username as subject plus expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn create_jwt(
        &self,
        username: &str,
        expires_in_minutes: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.create_jwt_at(username, expires_in_minutes, Utc::now().naive_utc())
    }

    pub fn create_jwt_at(
        &self,
        username: &str,
        expires_in_minutes: i64,
        issued_at: NaiveDateTime,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let issued_at = issued_at.and_utc();
        let claims = TokenClaims {
            sub: username.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::minutes(expires_in_minutes)).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(JWT_ALGORITHM);
        decode::<TokenClaims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_subject() {
        let manager = JwtManager::new("test-secret");
        let token = manager.create_jwt("alice", 30).unwrap();
        let claims = manager.decode_jwt(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn rejects_expired_token() {
        let manager = JwtManager::new("test-secret");
        let long_ago = Utc::now().naive_utc() - Duration::hours(2);
        let token = manager.create_jwt_at("alice", 30, long_ago).unwrap();
        assert!(manager.decode_jwt(&token).is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = JwtManager::new("one").create_jwt("alice", 30).unwrap();
        assert!(JwtManager::new("two").decode_jwt(&token).is_err());
    }
}
