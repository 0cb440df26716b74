/// Verification ledger queries. The ledger holds at most one outstanding
/// OTP challenge per account; issuing replaces, consuming deletes.
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::verification::EmailVerification;

/// Delete any outstanding challenge for the account and insert a fresh
/// one, in a single transaction.
pub async fn replace(
    pool: &PgPool,
    account_id: Uuid,
    otp_hash: &str,
    expires_at: DateTime<Utc>,
) -> ApiResult<EmailVerification> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    sqlx::query("DELETE FROM email_verifications WHERE account_id = $1")
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    let verification = sqlx::query_as::<_, EmailVerification>(
        r#"
        INSERT INTO email_verifications (id, account_id, otp_hash, attempts, expires_at)
        VALUES ($1, $2, $3, 0, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(otp_hash)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(verification)
}

/// Fetch the outstanding challenge for an account, if any.
pub async fn find_by_account(pool: &PgPool, account_id: Uuid) -> ApiResult<Option<EmailVerification>> {
    let verification = sqlx::query_as::<_, EmailVerification>(
        "SELECT * FROM email_verifications WHERE account_id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(verification)
}

/// Remove all challenges for an account (expiry cleanup, attempt
/// exhaustion, or supersession).
pub async fn delete_for_account(pool: &PgPool, account_id: Uuid) -> ApiResult<()> {
    sqlx::query("DELETE FROM email_verifications WHERE account_id = $1")
        .bind(account_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(())
}

/// Record a failed OTP comparison; returns the new attempt count, or
/// None when the challenge row has already gone away.
pub async fn increment_attempts(pool: &PgPool, verification_id: Uuid) -> ApiResult<Option<i32>> {
    let attempts = sqlx::query_scalar::<_, i32>(
        "UPDATE email_verifications SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts",
    )
    .bind(verification_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(attempts)
}

/// Successful verification: flip the account's verified flag and delete
/// the challenge in one transaction, so neither write applies alone.
pub async fn consume(pool: &PgPool, account_id: Uuid) -> ApiResult<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    sqlx::query("UPDATE accounts SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    sqlx::query("DELETE FROM email_verifications WHERE account_id = $1")
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(())
}
