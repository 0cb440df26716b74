/// Identity handlers, mounted once per role prefix. The role arrives as
/// a request extension attached by the router.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthAccount;
use crate::models::account::{
    AccountResponse, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, Role, UpdateProfileRequest,
};
use crate::models::verification::{ResendOtpRequest, VerifyOtpRequest};
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let account = state.auth.register(role, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Verification OTP email sent".to_string(),
            account: account.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (token, account) = state.auth.login(role, req).await?;

    Ok(Json(LoginResponse {
        token,
        account: account.into(),
    }))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<Json<Value>> {
    let (id, otp) = match (req.id, req.otp.as_deref()) {
        (Some(id), Some(otp)) if !otp.is_empty() => (id, otp),
        _ => {
            return Err(ApiError::Validation(
                "Empty OTP details are not allowed".to_string(),
            ))
        }
    };

    state.otp.verify(role, id, otp).await?;

    Ok(Json(json!({
        "message": format!("{} email verified successfully", role.display_name())
    })))
}

pub async fn resend_verify_otp(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(req): Json<ResendOtpRequest>,
) -> ApiResult<Json<Value>> {
    let (id, email) = match (req.id, req.email.as_deref()) {
        (Some(id), Some(email)) if !email.is_empty() => (id, email),
        _ => {
            return Err(ApiError::Validation(
                "Empty account details are not allowed".to_string(),
            ))
        }
    };

    state.otp.resend(role, id, email).await?;

    Ok(Json(json!({
        "message": "Verification OTP email sent",
        "data": { "id": id, "email": email }
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthAccount,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    state.auth.change_password(auth.id, req).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// Self-service profile update. The path id must be the caller's own.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    if auth.id != id {
        return Err(ApiError::Forbidden);
    }

    let account = state.directory.update(role, id, req).await?;

    Ok(Json(json!({
        "message": "Account updated successfully",
        "account": AccountResponse::from(account)
    })))
}

/// Authenticated probe: echoes the caller's account.
pub async fn protected(
    State(state): State<AppState>,
    auth: AuthAccount,
) -> ApiResult<Json<AccountResponse>> {
    let account = state.auth.current_account(auth.id).await?;
    Ok(Json(account.into()))
}
