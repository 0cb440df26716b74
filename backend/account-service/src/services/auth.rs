/// Registration, login, and password change for one role tier.
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{accounts, password_resets};
use crate::error::{ApiError, ApiResult};
use crate::models::account::{Account, ChangePasswordRequest, LoginRequest, RegisterRequest, Role};
use crate::security::{jwt, password};
use crate::services::otp::OtpService;
use crate::validators::{require_field, validate_email, validate_password_length};

#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    otp: OtpService,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: PgPool, otp: OtpService, jwt_secret: String) -> Self {
        Self {
            db,
            otp,
            jwt_secret,
        }
    }

    /// Create an unverified account and send the verification OTP.
    ///
    /// Required fields are checked in a fixed order and the first problem
    /// is reported alone. The account row commits before the email goes
    /// out, so a send failure still leaves a resendable registration.
    pub async fn register(&self, role: Role, req: RegisterRequest) -> ApiResult<Account> {
        let first_name = require_field(req.first_name.as_deref(), "Please enter your first name")?;
        let last_name = require_field(req.last_name.as_deref(), "Please enter your last name")?;
        let email = require_field(req.email.as_deref(), "Please enter your email address")?;
        if !validate_email(email) {
            return Err(ApiError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        let plain = require_field(req.password.as_deref(), "Please enter your password")?;
        if !validate_password_length(plain) {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        if accounts::email_exists(&self.db, role, email).await? {
            return Err(ApiError::EmailInUse);
        }

        let password_hash = password::hash_password(plain)?;
        let new_account = accounts::NewAccount {
            role,
            email: email.to_string(),
            password_hash,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            street: req.street,
            postcode: req.postcode,
            country: req.country,
            state_county: req.state_county,
            city_town: req.city_town,
            date_of_birth: req.date_of_birth,
            sex: req.sex,
            marital_status: req.marital_status,
            phone_number: req.phone_number,
            nationality: req.nationality,
        };

        let account = accounts::insert(&self.db, &new_account).await?;
        info!(account_id = %account.id, role = role.as_str(), "account registered");

        self.otp.issue_challenge(account.id, &account.email).await?;

        Ok(account)
    }

    /// Authenticate within a role scope and mint a session token.
    ///
    /// Unknown email and wrong password yield the same error; only a
    /// correct password against an unverified account is told apart.
    pub async fn login(&self, role: Role, req: LoginRequest) -> ApiResult<(String, Account)> {
        let email = require_field(req.email.as_deref(), "Please enter your email address")?;
        let plain = require_field(req.password.as_deref(), "Please enter your password")?;

        let account = accounts::find_by_email(&self.db, role, email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !password::verify_password(plain, &account.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        if !account.is_verified {
            return Err(ApiError::EmailNotVerified);
        }

        let token = jwt::sign_token(account.id, &self.jwt_secret)?;
        info!(account_id = %account.id, role = role.as_str(), "login succeeded");

        Ok((token, account))
    }

    /// Replace the caller's password after re-proving the old one.
    /// Outstanding reset tokens are revoked so the old credential cannot
    /// come back through a stale reset link.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        req: ChangePasswordRequest,
    ) -> ApiResult<()> {
        let old_plain = require_field(
            req.old_password.as_deref(),
            "Please enter your old password",
        )?;
        let new_plain = require_field(
            req.new_password.as_deref(),
            "Please enter your new password",
        )?;
        if !validate_password_length(new_plain) {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let account = accounts::find_by_id(&self.db, account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account record does not exist".to_string()))?;

        if !password::verify_password(old_plain, &account.password_hash)? {
            return Err(ApiError::IncorrectPassword);
        }

        let new_hash = password::hash_password(new_plain)?;
        accounts::update_password(&self.db, account_id, &new_hash).await?;
        password_resets::delete_for_account(&self.db, account_id).await?;
        info!(account_id = %account_id, "password changed");

        Ok(())
    }

    /// Resolve the account behind a verified token.
    pub async fn current_account(&self, account_id: Uuid) -> ApiResult<Account> {
        accounts::find_by_id(&self.db, account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account record does not exist".to_string()))
    }
}
