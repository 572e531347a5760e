//! Per-request identity resolution and route guards.
//!
//! [`deserialize_user`] runs before route logic on every request and never
//! rejects anything itself: it resolves the caller to an [`AuthContext`]
//! (possibly `Anonymous`) carried in the request extensions. Hard 401s
//! come only from the guards: [`require_role`] for role-gated routes and
//! the [`CurrentUser`] extractor for routes that merely need a login.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::error::AuthError;
use crate::models::user::Role;
use crate::models::AuthClaims;
use crate::security::{KeyClass, Verification};
use crate::services::auth_service;
use crate::AppState;

/// Request header carrying the refresh token.
pub const X_REFRESH_TOKEN: &str = "x-refresh-token";
/// Response header carrying a silently renewed access token.
pub const X_ACCESS_TOKEN: &str = "x-access-token";

/// The caller's resolved identity, threaded through request extensions as
/// an explicit immutable value.
#[derive(Debug, Clone)]
pub enum AuthContext {
    Anonymous,
    Authenticated(AuthClaims),
}

impl AuthContext {
    pub fn claims(&self) -> Option<&AuthClaims> {
        match self {
            AuthContext::Authenticated(claims) => Some(claims),
            AuthContext::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.claims().map(|c| c.role)
    }
}

/// Resolve the caller's identity from bearer credentials.
///
/// A valid access token authenticates the request. An expired one is
/// transparently renewed when a refresh token rides along: the renewal
/// chain re-reads session and subject, and on success the new token is
/// handed back in the `x-access-token` response header. Every failure
/// along the way degrades to anonymous; route guards decide whether
/// anonymity is acceptable.
pub async fn deserialize_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let access_token = bearer_token(req.headers()).map(str::to_owned);
    let refresh_token = req
        .headers()
        .get(X_REFRESH_TOKEN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut renewed_token = None;

    let context = match access_token.as_deref() {
        None => AuthContext::Anonymous,
        Some(token) => match state.codec.verify::<AuthClaims>(KeyClass::Access, token) {
            Verification::Valid(claims) => AuthContext::Authenticated(claims),
            Verification::Expired => match refresh_token.as_deref() {
                Some(refresh) => {
                    match auth_service::reissue_access_token(&state, refresh).await {
                        Ok((token, claims)) => {
                            renewed_token = Some(token);
                            AuthContext::Authenticated(claims)
                        }
                        Err(err) => {
                            tracing::debug!(error = %err, "silent token renewal failed");
                            AuthContext::Anonymous
                        }
                    }
                }
                None => AuthContext::Anonymous,
            },
            Verification::Malformed => AuthContext::Anonymous,
        },
    };

    req.extensions_mut().insert(context);

    let mut response = next.run(req).await;

    if let Some(token) = renewed_token {
        if let Ok(value) = HeaderValue::from_str(&token) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(X_ACCESS_TOKEN), value);
        }
    }

    response
}

/// Reusable role guard, applied per-route with `route_layer`. Rejects
/// anonymous callers and callers whose role is outside `allowed`.
pub async fn require_role(
    req: Request,
    next: Next,
    allowed: &'static [Role],
) -> Result<Response, AuthError> {
    let role = req
        .extensions()
        .get::<AuthContext>()
        .and_then(AuthContext::role);

    match role {
        Some(role) if allowed.contains(&role) => Ok(next.run(req).await),
        _ => Err(AuthError::NotAuthorized),
    }
}

/// Extractor for routes that require a logged-in caller; rejects
/// anonymity with a 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthClaims);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.claims().cloned())
            .map(CurrentUser)
            .ok_or(AuthError::Unauthenticated)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_is_none() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn empty_bearer_is_none() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }
}
