use crate::error::Result;
use crate::models::user::{RegisterRequest, Role, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Look up a user by email, case-insensitively.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Create a user from a registration request. The email is stored
/// lowercased so later lookups stay case-insensitive.
pub async fn create_user(
    pool: &PgPool,
    req: &RegisterRequest,
    password_hash: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, phone, password_hash, role, brand, city, vendor_type)
        VALUES ($1, LOWER($2), $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(password_hash)
    .bind(req.role)
    .bind(&req.brand)
    .bind(&req.city)
    .bind(&req.vendor_type)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2
        "#,
    )
    .bind(password_hash)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_verified(pool: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users SET verified = TRUE, updated_at = now() WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Paginated user listing for the admin surface, optionally filtered by
/// role and by a case-insensitive name/email substring.
pub async fn list_users(
    pool: &PgPool,
    role: Option<Role>,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<User>, i64)> {
    let pattern = search.map(|q| format!("%{q}%"));

    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE ($1::user_role IS NULL OR role = $1)
          AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
        ORDER BY created_at ASC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(role)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM users
        WHERE ($1::user_role IS NULL OR role = $1)
          AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
        "#,
    )
    .bind(role)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    Ok((users, total))
}
