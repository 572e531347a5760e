//! Route table.
//!
//! Identity resolution runs on the `/auth` and `/admin` trees; `/health`
//! stays outside it. Role gates are attached per-route with `route_layer`
//! so they run after identity resolution but before the handler.

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, auth};
use crate::middleware::{deserialize_user, require_role};
use crate::models::user::PRIVILEGED_ROLES;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/login-admin", post(auth::login_admin))
        .route("/renew", post(auth::renew_access_token))
        .route("/verify/:token", get(auth::verify_email))
        .route("/logout", delete(auth::logout))
        .route("/get-role", get(auth::get_role))
        .route("/sessions", get(auth::get_sessions))
        .route("/change-password", post(auth::change_password));

    let admin_routes = Router::new()
        .route("/auth/get-all-users", get(admin::get_all_users))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_role(req, next, PRIVILEGED_ROLES)
        }));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            deserialize_user,
        ))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "auth-service" }))
}
