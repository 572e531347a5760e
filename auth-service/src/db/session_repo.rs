use crate::error::Result;
use crate::models::Session;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_session(pool: &PgPool, user_id: Uuid, user_agent: &str) -> Result<Session> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (user_id, user_agent)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(user_agent)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn get_session(pool: &PgPool, session_id: Uuid) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT * FROM sessions WHERE id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Flip a session's validity off. Idempotent: invalidating an
/// already-invalid (or unknown) session is a no-op success, and the flag
/// never flips back to true.
pub async fn invalidate_session(pool: &PgPool, session_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE sessions SET valid = FALSE WHERE id = $1
        "#,
    )
    .bind(session_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Active sessions for a user, most recent first ("active devices" view).
pub async fn list_active_sessions(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        r#"
        SELECT * FROM sessions
        WHERE user_id = $1 AND valid = TRUE
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}
