/// Password reset ledger queries. Tokens live as SHA-256 digests and are
/// deleted on consumption, so a token can be revoked at any time by
/// removing its row.
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Token lifetime in minutes
const TOKEN_EXPIRY_MINUTES: i64 = 30;

/// Raw token length (before hashing)
const TOKEN_LENGTH: usize = 32;

/// Result of creating a password reset token
#[derive(Debug)]
pub struct CreatedToken {
    /// The raw token, mailed to the account holder and never stored
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a random alphanumeric token
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a token using SHA-256
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create a reset token for an account, superseding any outstanding one.
/// Returns the raw token for the reset email.
pub async fn create(pool: &PgPool, account_id: Uuid) -> ApiResult<CreatedToken> {
    delete_for_account(pool, account_id).await?;

    let raw_token = generate_token();
    let token_hash = hash_token(&raw_token);
    let expires_at = Utc::now() + Duration::minutes(TOKEN_EXPIRY_MINUTES);

    sqlx::query(
        r#"
        INSERT INTO password_resets (id, account_id, token_hash, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(&token_hash)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(CreatedToken {
        token: raw_token,
        expires_at,
    })
}

/// Redeem a token: look up the unexpired row by digest, write the new
/// password hash, and delete the row, all in one transaction. Returns the
/// account id on success, None when the token is unknown, spent, or
/// expired.
pub async fn consume(
    pool: &PgPool,
    token: &str,
    new_password_hash: &str,
) -> ApiResult<Option<Uuid>> {
    let token_hash = hash_token(token);

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    let row = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT account_id FROM password_resets
        WHERE token_hash = $1
          AND expires_at > NOW()
        FOR UPDATE
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    let Some((account_id,)) = row else {
        return Ok(None);
    };

    sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(new_password_hash)
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    sqlx::query("DELETE FROM password_resets WHERE token_hash = $1")
        .bind(&token_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(Some(account_id))
}

/// Revoke all reset tokens for an account. Used when issuing a new token
/// and after a successful password change.
pub async fn delete_for_account(pool: &PgPool, account_id: Uuid) -> ApiResult<u64> {
    let result = sqlx::query("DELETE FROM password_resets WHERE account_id = $1")
        .bind(account_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_hash_token() {
        let token = "test_token_123";
        let hash1 = hash_token(token);
        let hash2 = hash_token(token);

        // Same input should produce same hash
        assert_eq!(hash1, hash2);

        // Hash should be 64 characters (SHA-256 hex)
        assert_eq!(hash1.len(), 64);

        // Different input should produce different hash
        let hash3 = hash_token("different_token");
        assert_ne!(hash1, hash3);
    }
}
