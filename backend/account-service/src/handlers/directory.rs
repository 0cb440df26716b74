/// Directory handlers for managing lower-tier accounts. Each mount is
/// parameterized by the managed role; authorization loads the caller's
/// account and checks its capability against that target.
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
    AccountResponse, RegisterRequest, RegisterResponse, Role, UpdateProfileRequest,
};
use crate::AppState;

/// Role being administered by a directory mount. A distinct type from the
/// prefix role extension, so the two never shadow each other.
#[derive(Debug, Clone, Copy)]
pub struct ManagedRole(pub Role);

async fn authorize(state: &AppState, caller: AuthAccount, target: Role) -> ApiResult<()> {
    let account = state.auth.current_account(caller.id).await?;
    if !account.role.can_manage(target) {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Privileged registration into the managed scope; runs the same
/// pipeline as self-registration, OTP email included.
pub async fn register_managed(
    State(state): State<AppState>,
    Extension(ManagedRole(target)): Extension<ManagedRole>,
    auth: AuthAccount,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    authorize(&state, auth, target).await?;

    let account = state.auth.register(target, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Verification OTP email sent".to_string(),
            account: account.into(),
        }),
    ))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(ManagedRole(target)): Extension<ManagedRole>,
    auth: AuthAccount,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    authorize(&state, auth, target).await?;

    let accounts = state.directory.list(target).await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

pub async fn get_account(
    State(state): State<AppState>,
    Extension(ManagedRole(target)): Extension<ManagedRole>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountResponse>> {
    authorize(&state, auth, target).await?;

    let account = state.directory.get(target, id).await?;
    Ok(Json(account.into()))
}

pub async fn update_account(
    State(state): State<AppState>,
    Extension(ManagedRole(target)): Extension<ManagedRole>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&state, auth, target).await?;

    let account = state.directory.update(target, id, req).await?;

    Ok(Json(json!({
        "message": format!("{} account updated successfully", target.display_name()),
        "account": AccountResponse::from(account)
    })))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(ManagedRole(target)): Extension<ManagedRole>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    authorize(&state, auth, target).await?;

    state.directory.delete(target, id).await?;

    Ok(Json(json!({
        "message": format!("{} deleted successfully", target.display_name())
    })))
}
