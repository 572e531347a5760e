/// Session model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authenticated device/browser login.
///
/// Sessions are created at login and only ever mutated by flipping `valid`
/// to false. A session never becomes valid again and is never deleted, so
/// the table doubles as a login audit trail. Multiple sessions per user
/// coexist (multi-device).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_agent: String,
    pub valid: bool,
    pub created_at: DateTime<Utc>,
}
