/// Admin-only handlers
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::user_repo;
use crate::error::Result;
use crate::models::user::{Role, UserResponse};
use crate::AppState;

const MAX_PER_PAGE: i64 = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    pub q: Option<String>,
    pub role: Option<Role>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub total_pages: i64,
}

/// Paginated user listing, optionally filtered by role and by a
/// name/email substring. Guarded by the Admin/Super role set in routing.
pub async fn get_all_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, MAX_PER_PAGE);
    let offset = page_offset(page, per_page);

    let (users, total) = user_repo::list_users(
        &state.db,
        query.role,
        query.q.as_deref(),
        per_page,
        offset,
    )
    .await?;

    let total_pages = (total + per_page - 1) / per_page;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        total_pages,
    }))
}

/// Offset for a 1-based page number. Saturates rather than overflowing
/// on absurd pages; a saturated offset just returns an empty page.
fn page_offset(page: i64, per_page: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn page_offset_tolerates_out_of_range_pages() {
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(-7, 10), 0);
        assert_eq!(page_offset(i64::MAX, MAX_PER_PAGE), i64::MAX);
    }
}
