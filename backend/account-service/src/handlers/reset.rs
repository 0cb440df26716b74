/// Credential recovery handlers.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::models::account::Role;
use crate::models::verification::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::AppState;

pub async fn forgot_password(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Value>> {
    let email = state.reset.forgot_password(role, req).await?;

    Ok(Json(json!({
        "message": "Password reset email sent successfully",
        "data": { "email": email }
    })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    state.reset.reset_password(&token, req).await?;

    Ok(Json(json!({ "message": "Password reset successfully" })))
}
