use chrono::{DateTime, Utc};
/// Credential subject (user) model and auth request bodies
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Closed role enumeration, stored as the `user_role` Postgres enum.
///
/// Authorization policy is expressed as per-route slices of these values
/// rather than strings, so a typo'd role can't silently open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    User,
    Vendor,
    Admin,
    Super,
}

/// Roles allowed through the admin login and the admin route guard.
pub const PRIVILEGED_ROLES: &[Role] = &[Role::Admin, Role::Super];

impl Role {
    pub fn is_privileged(self) -> bool {
        PRIVILEGED_ROLES.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "User",
            Role::Vendor => "Vendor",
            Role::Admin => "Admin",
            Role::Super => "Super",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored lowercased; matched case-insensitively.
    pub email: String,
    pub phone: Option<String>,
    /// None for social-login-only accounts.
    pub password_hash: Option<String>,
    pub role: Role,
    pub verified: bool,
    pub brand: Option<String>,
    pub city: Option<String>,
    pub vendor_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Accounts created through a social provider carry no password hash.
    pub fn is_social_only(&self) -> bool {
        self.password_hash.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(max = 64))]
    pub email: String,
    #[validate(length(max = 64))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_registration"))]
pub struct RegisterRequest {
    #[validate(length(max = 64))]
    pub name: String,
    #[validate(email, length(max = 64))]
    pub email: String,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub password: String,
    #[validate(length(max = 64))]
    pub brand: Option<String>,
    #[validate(length(max = 64))]
    pub city: Option<String>,
    #[validate(length(max = 64))]
    pub vendor_type: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// Self-service registration only hands out the two public roles, and a
/// vendor account is useless without its marketplace profile fields.
fn validate_registration(req: &RegisterRequest) -> Result<(), ValidationError> {
    match req.role {
        Role::User => Ok(()),
        Role::Vendor => {
            let complete = req.phone.is_some()
                && req.city.is_some()
                && req.brand.is_some()
                && req.vendor_type.is_some();
            if complete {
                Ok(())
            } else {
                let mut error = ValidationError::new("vendor_profile_incomplete");
                error.message =
                    Some("Vendor accounts require phone, city, brand and vendorType".into());
                Err(error)
            }
        }
        Role::Admin | Role::Super => {
            let mut error = ValidationError::new("role_not_allowed");
            error.message = Some("Cannot self-register a privileged role".into());
            Err(error)
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 6, message = "Old password must be at least 6 characters"))]
    pub old_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewTokenRequest {
    pub refresh_token: String,
}

/// Public view of a user record; never exposes the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub verified: bool,
    pub brand: Option<String>,
    pub city: Option<String>,
    pub vendor_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            verified: user.verified,
            brand: user.brand,
            city: user.city,
            vendor_type: user.vendor_type,
            created_at: user.created_at,
        }
    }
}
