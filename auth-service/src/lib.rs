//! Session/token authentication service.
//!
//! RS256 token pairs bound to server-side sessions: login mints a pair,
//! the request gate resolves callers (renewing expired access tokens
//! silently), logout revokes the session, and role guards protect the
//! admin surface.

use std::sync::Arc;

use sqlx::PgPool;

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{AuthError, Result};

use token_codec::TokenCodec;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<Config>,
}
