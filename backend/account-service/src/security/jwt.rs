/// Stateless session tokens: HS256, one-hour lifetime, account id payload.
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a token asserting the account id, signed with the process-wide secret.
pub fn sign_token(account_id: Uuid, secret: &str) -> ApiResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id: account_id,
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Token signing failed: {}", e)))
}

/// Decode and validate a token, returning its claims.
pub fn verify_token(token: &str, secret: &str) -> ApiResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    #[test]
    fn test_token_round_trip() {
        let id = Uuid::new_v4();
        let token = sign_token(id, SECRET).expect("should sign token");
        let claims = verify_token(&token, SECRET).expect("should verify token");

        assert_eq!(claims.id, id);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token(Uuid::new_v4(), SECRET).expect("should sign token");
        let result = verify_token(&token, "another-secret");
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: Uuid::new_v4(),
            iat: now - 2 * TOKEN_TTL_SECS,
            exp: now - TOKEN_TTL_SECS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("should sign token");

        let result = verify_token(&token, SECRET);
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token", SECRET).is_err());
    }
}
