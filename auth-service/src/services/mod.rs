/// Core business logic for the authentication system
pub mod auth_service;
