/// HTTP request handlers (REST API)
pub mod admin;
pub mod auth;
