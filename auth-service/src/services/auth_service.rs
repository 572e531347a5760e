//! Login, renewal, logout and the other credential flows.
//!
//! Each function is one request's worth of work: at most a couple of
//! sequential store lookups plus a token mint, no retries. Concurrent
//! renewals against the same session are safe to race; each mints an
//! independently valid token from current data.

use serde::Serialize;

use crate::db::{session_repo, user_repo};
use crate::error::{AuthError, Result};
use crate::models::user::{RegisterRequest, User};
use crate::models::AuthClaims;
use crate::security::{password, verification, KeyClass, Verification};
use crate::AppState;

/// Token pair returned by the login endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Password login. Gate order: subject lookup, social-login check,
/// password comparison, verified flag.
pub async fn login(
    state: &AppState,
    email: &str,
    password_input: &str,
    user_agent: &str,
) -> Result<IssuedTokens> {
    let user = user_repo::find_by_email(&state.db, email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    check_password_gates(&user, password_input)?;

    issue_session_tokens(state, &user, user_agent).await
}

/// Admin login: identical to [`login`] plus a role gate, checked right
/// after the lookup. The role gate and the password gate are independent;
/// both must pass.
pub async fn login_admin(
    state: &AppState,
    email: &str,
    password_input: &str,
    user_agent: &str,
) -> Result<IssuedTokens> {
    let user = user_repo::find_by_email(&state.db, email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !user.role.is_privileged() {
        return Err(AuthError::NotAuthorized);
    }

    check_password_gates(&user, password_input)?;

    issue_session_tokens(state, &user, user_agent).await
}

/// The shared credential gates: social-only accounts have no hash to
/// compare, a mismatch is invalid credentials, and an unverified email
/// blocks login even with the right password.
pub(crate) fn check_password_gates(user: &User, password_input: &str) -> Result<()> {
    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AuthError::UseSocialLogin)?;

    if !password::verify_password(password_input, hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    if !user.verified {
        return Err(AuthError::NotVerified);
    }

    Ok(())
}

/// Create a session and mint the access/refresh pair bound to it.
async fn issue_session_tokens(
    state: &AppState,
    user: &User,
    user_agent: &str,
) -> Result<IssuedTokens> {
    let session = session_repo::create_session(&state.db, user.id, user_agent).await?;

    let access_claims = AuthClaims::new(user, session.id, state.config.access_token_ttl());
    let refresh_claims = AuthClaims::new(user, session.id, state.config.refresh_token_ttl());

    let access_token = state.codec.sign(KeyClass::Access, &access_claims)?;
    let refresh_token = state.codec.sign(KeyClass::Refresh, &refresh_claims)?;

    tracing::info!(user = %user.email, session = %session.id, "session issued");

    Ok(IssuedTokens {
        access_token,
        refresh_token,
    })
}

/// Mint a new access token from a refresh token.
///
/// The new claims are read fresh from the users table, never from the
/// refresh token's own (possibly stale) snapshot, so a role or email
/// change shows up on the very next renewal. The session id carries over
/// unchanged.
pub async fn reissue_access_token(
    state: &AppState,
    refresh_token: &str,
) -> Result<(String, AuthClaims)> {
    let claims: AuthClaims = match state.codec.verify(KeyClass::Refresh, refresh_token) {
        Verification::Valid(claims) => claims,
        Verification::Expired => return Err(AuthError::TokenExpired),
        Verification::Malformed => return Err(AuthError::TokenMalformed),
    };

    let session = session_repo::get_session(&state.db, claims.session)
        .await?
        .ok_or(AuthError::SessionRevoked)?;

    if !session.valid {
        return Err(AuthError::SessionRevoked);
    }

    // A deleted subject leaves the session unable to mint anything.
    let user = user_repo::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or(AuthError::SessionRevoked)?;

    let fresh_claims = AuthClaims::new(&user, session.id, state.config.access_token_ttl());
    let access_token = state.codec.sign(KeyClass::Access, &fresh_claims)?;

    Ok((access_token, fresh_claims))
}

/// Invalidate the caller's session. Sibling sessions on other devices are
/// untouched, and access tokens already in flight stay valid until their
/// TTL runs out (the configured exposure window).
pub async fn logout(state: &AppState, session_id: uuid::Uuid) -> Result<()> {
    session_repo::invalidate_session(&state.db, session_id).await?;
    tracing::info!(session = %session_id, "session invalidated");
    Ok(())
}

/// Replace the caller's password after re-verifying the old one. No token
/// re-issuance: outstanding tokens live out their TTL.
pub async fn change_password(
    state: &AppState,
    user_id: uuid::Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let user = user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AuthError::UseSocialLogin)?;

    if !password::verify_password(old_password, hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let new_hash = password::hash_password(new_password)?;
    user_repo::update_password(&state.db, user.id, &new_hash).await?;

    tracing::info!(user = %user.email, "password changed");
    Ok(())
}

/// Register a new account. The subject starts unverified; the verification
/// token is issued here, while delivering it (mail) happens out of process.
pub async fn register(state: &AppState, req: &RegisterRequest) -> Result<User> {
    if user_repo::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = user_repo::create_user(&state.db, req, &password_hash).await?;

    let token = verification::issue(
        &state.config.verification_token_secret,
        &user.email,
        state.config.verification_token_ttl(),
    )?;
    tracing::debug!(user = %user.email, token = %token, "verification token issued");

    Ok(user)
}

/// Flip the `verified` flag for the subject named in a verification token.
pub async fn verify_email(state: &AppState, token: &str) -> Result<()> {
    let claims = verification::decode_token(&state.config.verification_token_secret, token)?;

    let user = user_repo::find_by_email(&state.db, &claims.email)
        .await?
        .ok_or(AuthError::TokenMalformed)?;

    if user.verified {
        return Err(AuthError::Validation("Email already verified".to_string()));
    }

    user_repo::set_verified(&state.db, user.id).await?;
    tracing::info!(user = %user.email, "email verified");
    Ok(())
}
