/// OTP challenges: issue, verify, resend against the verification ledger.
use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{accounts, email_verifications};
use crate::error::{ApiError, ApiResult};
use crate::models::account::Role;
use crate::security::password;
use crate::services::email::{mask_email, EmailService};

/// Challenge lifetime
const OTP_EXPIRY_HOURS: i64 = 6;

/// Failed comparisons allowed before the challenge is destroyed. The
/// code space is only 9000 values, so guessing must stay bounded.
const MAX_OTP_ATTEMPTS: i32 = 5;

/// Generate a 4-digit decimal code. Not security-critical on its own:
/// codes are single-use, stored hashed, and attempt-bounded.
fn generate_otp() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

#[derive(Clone)]
pub struct OtpService {
    db: PgPool,
    email: EmailService,
}

impl OtpService {
    pub fn new(db: PgPool, email: EmailService) -> Self {
        Self { db, email }
    }

    /// Record a fresh challenge for the account, then email the code.
    ///
    /// The row is durably written before any send is attempted, so a mail
    /// failure leaves a challenge that resend can replace. Any prior
    /// challenge is superseded.
    pub async fn issue_challenge(&self, account_id: Uuid, email: &str) -> ApiResult<()> {
        let otp = generate_otp();
        let otp_hash = password::hash_password(&otp)?;
        let expires_at = Utc::now() + Duration::hours(OTP_EXPIRY_HOURS);

        email_verifications::replace(&self.db, account_id, &otp_hash, expires_at).await?;
        info!(
            account_id = %account_id,
            email = %mask_email(email),
            "verification challenge recorded"
        );

        self.email.send_otp_email(email, &otp).await
    }

    /// Check a submitted code against the account's outstanding challenge.
    ///
    /// On a match the verified flag flips and the challenge row is deleted
    /// in one transaction. Expired challenges are removed on detection.
    pub async fn verify(&self, role: Role, account_id: Uuid, otp: &str) -> ApiResult<()> {
        accounts::find_by_id_in_role(&self.db, role, account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account record does not exist".to_string()))?;

        let challenge = email_verifications::find_by_account(&self.db, account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account record does not exist".to_string()))?;

        if challenge.expires_at < Utc::now() {
            email_verifications::delete_for_account(&self.db, account_id).await?;
            return Err(ApiError::OtpExpired);
        }

        if !password::verify_password(otp, &challenge.otp_hash)? {
            let attempts = email_verifications::increment_attempts(&self.db, challenge.id)
                .await?
                .unwrap_or(MAX_OTP_ATTEMPTS);

            if attempts >= MAX_OTP_ATTEMPTS {
                email_verifications::delete_for_account(&self.db, account_id).await?;
                warn!(
                    account_id = %account_id,
                    attempts, "challenge destroyed after repeated failed attempts"
                );
                return Err(ApiError::TooManyOtpAttempts);
            }

            warn!(account_id = %account_id, attempts, "invalid OTP submitted");
            return Err(ApiError::InvalidOtp);
        }

        email_verifications::consume(&self.db, account_id).await?;
        info!(account_id = %account_id, role = role.as_str(), "email verified");
        Ok(())
    }

    /// Reissue a challenge to the given address, superseding any
    /// outstanding one.
    pub async fn resend(&self, role: Role, account_id: Uuid, email: &str) -> ApiResult<()> {
        accounts::find_by_id_in_role(&self.db, role, account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account record does not exist".to_string()))?;

        self.issue_challenge(account_id, email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_four_digits_in_range() {
        for _ in 0..1000 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 4);
            let value: u32 = otp.parse().expect("OTP should be numeric");
            assert!((1000..=9999).contains(&value));
        }
    }
}
