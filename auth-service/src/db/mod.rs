pub mod session_repo;
pub mod user_repo;
