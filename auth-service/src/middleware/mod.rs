pub mod auth;

pub use auth::{deserialize_user, require_role, AuthContext, CurrentUser};
