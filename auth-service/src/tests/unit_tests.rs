use axum::response::IntoResponse;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::fixtures;
use crate::error::AuthError;
use crate::models::user::{RegisterRequest, Role, PRIVILEGED_ROLES};
use crate::models::AuthClaims;
use crate::security::{KeyClass, Verification};
use crate::services::auth_service::check_password_gates;

#[test]
fn claims_snapshot_subject_fields() {
    let user = fixtures::test_user(Role::Vendor);
    let session = Uuid::new_v4();
    let claims = AuthClaims::new(&user, session, chrono::Duration::seconds(900));

    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.name, user.name);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, Role::Vendor);
    assert_eq!(claims.session, session);
    assert_eq!(claims.exp - claims.iat, 900);
    assert!((claims.iat - Utc::now().timestamp()).abs() <= 2);
}

#[test]
fn auth_claims_roundtrip_through_codec() {
    let codec = fixtures::test_codec();
    let user = fixtures::test_user(Role::User);
    let claims = fixtures::claims_expiring_in(&user, 900);

    let token = codec.sign(KeyClass::Access, &claims).unwrap();

    match codec.verify::<AuthClaims>(KeyClass::Access, &token) {
        Verification::Valid(decoded) => assert_eq!(decoded, claims),
        other => panic!("expected Valid, got {other:?}"),
    }
}

#[test]
fn expired_claims_verify_expired() {
    let codec = fixtures::test_codec();
    let user = fixtures::test_user(Role::User);
    let claims = fixtures::claims_expiring_in(&user, -5);

    let token = codec.sign(KeyClass::Access, &claims).unwrap();

    assert!(codec
        .verify::<AuthClaims>(KeyClass::Access, &token)
        .is_expired());
}

#[test]
fn privileged_role_set() {
    assert!(Role::Admin.is_privileged());
    assert!(Role::Super.is_privileged());
    assert!(!Role::User.is_privileged());
    assert!(!Role::Vendor.is_privileged());
    assert_eq!(PRIVILEGED_ROLES.len(), 2);
}

fn register_request(role: &str, with_vendor_profile: bool) -> RegisterRequest {
    let body = serde_json::json!({
        "name": "Anna",
        "email": "anna@example.com",
        "password": "secret123",
        "role": role,
        "phone": with_vendor_profile.then_some("+79001112233"),
        "city": with_vendor_profile.then_some("Moscow"),
        "brand": with_vendor_profile.then_some("Anna Flowers"),
        "vendorType": with_vendor_profile.then_some("florist"),
    });
    serde_json::from_value(body).unwrap()
}

#[test]
fn plain_user_registration_validates() {
    assert!(register_request("User", false).validate().is_ok());
}

#[test]
fn vendor_registration_requires_full_profile() {
    assert!(register_request("Vendor", true).validate().is_ok());
    assert!(register_request("Vendor", false).validate().is_err());
}

#[test]
fn privileged_roles_cannot_self_register() {
    assert!(register_request("Admin", false).validate().is_err());
    assert!(register_request("Super", true).validate().is_err());
}

#[test]
fn register_role_defaults_to_user() {
    let req: RegisterRequest = serde_json::from_value(serde_json::json!({
        "name": "Anna",
        "email": "anna@example.com",
        "password": "secret123",
    }))
    .unwrap();

    assert_eq!(req.role, Role::User);
}

#[test]
fn correct_password_on_verified_account_passes_the_gates() {
    let user = fixtures::test_user_with_password(Role::User, "secret123");
    assert!(check_password_gates(&user, "secret123").is_ok());
}

#[test]
fn social_only_account_is_directed_to_social_login() {
    let mut user = fixtures::test_user(Role::User);
    user.password_hash = None;

    assert!(matches!(
        check_password_gates(&user, "secret123"),
        Err(AuthError::UseSocialLogin)
    ));
}

#[test]
fn wrong_password_is_invalid_credentials() {
    let user = fixtures::test_user_with_password(Role::User, "secret123");

    assert!(matches!(
        check_password_gates(&user, "not-the-password"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn unverified_account_is_rejected_even_with_the_right_password() {
    let mut user = fixtures::test_user_with_password(Role::User, "secret123");
    user.verified = false;

    assert!(matches!(
        check_password_gates(&user, "secret123"),
        Err(AuthError::NotVerified)
    ));
}

#[test]
fn credential_errors_are_400() {
    for err in [
        AuthError::InvalidCredentials,
        AuthError::UserNotFound,
        AuthError::EmailAlreadyExists,
        AuthError::NotVerified,
        AuthError::UseSocialLogin,
        AuthError::Validation("bad".to_string()),
    ] {
        assert_eq!(err.into_response().status(), 400);
    }
}

#[test]
fn token_and_authorization_errors_are_401() {
    for err in [
        AuthError::NotAuthorized,
        AuthError::Unauthenticated,
        AuthError::TokenExpired,
        AuthError::TokenMalformed,
        AuthError::SessionRevoked,
    ] {
        assert_eq!(err.into_response().status(), 401);
    }
}

#[test]
fn infrastructure_errors_are_500() {
    assert_eq!(
        AuthError::Database("down".to_string())
            .into_response()
            .status(),
        500
    );
}

#[test]
fn issued_tokens_serialize_camel_case() {
    let tokens = crate::services::auth_service::IssuedTokens {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
    };
    let value = serde_json::to_value(&tokens).unwrap();

    assert!(value.get("accessToken").is_some());
    assert!(value.get("refreshToken").is_some());
}
