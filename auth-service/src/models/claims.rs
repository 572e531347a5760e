/// Signed token claims
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// The claim set embedded in both access and refresh tokens.
///
/// Claims are a snapshot of the subject taken at signing time; they are
/// immutable once issued and may go stale relative to the users table
/// until the next renewal re-reads the live record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject id (user id).
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Id of the revocable session this token is tied to.
    pub session: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl AuthClaims {
    /// Snapshot `user` into a claim set bound to `session_id`, expiring
    /// after `ttl`.
    pub fn new(user: &User, session_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            session: session_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}
