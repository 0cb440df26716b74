/// Credential recovery: forgot-password token issue and reset consumption.
use sqlx::PgPool;
use tracing::info;

use crate::db::{accounts, password_resets};
use crate::error::{ApiError, ApiResult};
use crate::models::account::Role;
use crate::models::verification::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::security::password;
use crate::services::email::EmailService;
use crate::validators::{require_field, validate_password_length};

#[derive(Clone)]
pub struct ResetService {
    db: PgPool,
    email: EmailService,
}

impl ResetService {
    pub fn new(db: PgPool, email: EmailService) -> Self {
        Self { db, email }
    }

    /// Issue a reset token for the account and mail the reset link.
    ///
    /// Returns the address the link was sent to. The token row commits
    /// before the send, matching the registration flow. An unknown email
    /// is reported as not found.
    pub async fn forgot_password(
        &self,
        role: Role,
        req: ForgotPasswordRequest,
    ) -> ApiResult<String> {
        let email = require_field(req.email.as_deref(), "Please enter your email address")?;

        let account = accounts::find_by_email(&self.db, role, email)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account record does not exist".to_string()))?;

        let created = password_resets::create(&self.db, account.id).await?;
        info!(account_id = %account.id, "password reset token issued");

        self.email
            .send_password_reset_email(&account.email, &created.token)
            .await?;

        Ok(account.email)
    }

    /// Consume a reset token and install the new password.
    ///
    /// Unknown, expired, and already-used tokens are indistinguishable to
    /// the caller. The new password faces the same length floor as
    /// registration.
    pub async fn reset_password(&self, token: &str, req: ResetPasswordRequest) -> ApiResult<()> {
        let plain = require_field(req.password.as_deref(), "Please enter your password")?;
        if !validate_password_length(plain) {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let new_hash = password::hash_password(plain)?;
        let account_id = password_resets::consume(&self.db, token, &new_hash)
            .await?
            .ok_or(ApiError::InvalidResetToken)?;

        info!(account_id = %account_id, "password reset completed");
        Ok(())
    }
}
