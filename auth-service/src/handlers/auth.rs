/// Authentication handlers
use axum::{
    extract::{Path, State},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::db::{session_repo, user_repo};
use crate::error::{AuthError, Result};
use crate::middleware::CurrentUser;
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, RenewTokenRequest, Role, UserResponse,
};
use crate::models::Session;
use crate::services::auth_service::{self, IssuedTokens};
use crate::AppState;

/// Cap for the "active devices" view.
const ACTIVE_SESSIONS_LIMIT: i64 = 20;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
}

/// Logout clears both tokens client-side by echoing nulls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = auth_service::register(&state, &payload).await?;

    Ok(Json(RegisterResponse { user: user.into() }))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<IssuedTokens>> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let tokens = auth_service::login(
        &state,
        &payload.email,
        &payload.password,
        user_agent(&headers),
    )
    .await?;

    Ok(Json(tokens))
}

pub async fn login_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<IssuedTokens>> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let tokens = auth_service::login_admin(
        &state,
        &payload.email,
        &payload.password,
        user_agent(&headers),
    )
    .await?;

    Ok(Json(tokens))
}

/// Explicit renewal endpoint; the request gate performs the same chain
/// silently for expired bearer tokens.
pub async fn renew_access_token(
    State(state): State<AppState>,
    Json(payload): Json<RenewTokenRequest>,
) -> Result<Json<RenewResponse>> {
    if payload.refresh_token.is_empty() {
        return Err(AuthError::TokenMalformed);
    }

    let (access_token, _claims) =
        auth_service::reissue_access_token(&state, &payload.refresh_token).await?;

    Ok(Json(RenewResponse { access_token }))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<LogoutResponse>> {
    auth_service::logout(&state, claims.session).await?;

    Ok(Json(LogoutResponse {
        access_token: None,
        refresh_token: None,
    }))
}

/// Role as currently stored, not the snapshot in the caller's token.
pub async fn get_role(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<RoleResponse>> {
    let user = user_repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(RoleResponse { role: user.role }))
}

pub async fn get_sessions(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<SessionsResponse>> {
    let sessions =
        session_repo::list_active_sessions(&state.db, claims.sub, ACTIVE_SESSIONS_LIMIT).await?;

    Ok(Json(SessionsResponse { sessions }))
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    auth_service::change_password(
        &state,
        claims.sub,
        &payload.old_password,
        &payload.new_password,
    )
    .await?;

    Ok(Json(MessageResponse {
        msg: "Password changed successfully".to_string(),
    }))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>> {
    auth_service::verify_email(&state, &token).await?;

    Ok(Json(MessageResponse {
        msg: "Email verified".to_string(),
    }))
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
