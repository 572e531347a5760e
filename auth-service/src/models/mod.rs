/// Data models for authentication
pub mod claims;
pub mod session;
pub mod user;

pub use claims::AuthClaims;
pub use session::Session;
pub use user::{Role, User};
