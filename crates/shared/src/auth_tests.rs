use super::*;
use chrono::Duration;

#[test]
fn claims_sets_expiration_and_iat() {
    let user = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::minutes(30);
    let before = Utc::now().timestamp();
    let claims = Claims::new(user, "admin", expires_at);
    let after = Utc::now().timestamp();

    assert_eq!(claims.user_id(), user);
    assert!(claims.iat >= before);
    assert!(claims.iat <= after);
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn only_admin_role_is_admin() {
    let expires_at = Utc::now() + Duration::minutes(5);
    assert!(Claims::new(Uuid::new_v4(), "admin", expires_at).is_admin());
    assert!(!Claims::new(Uuid::new_v4(), "teacher", expires_at).is_admin());
    assert!(!Claims::new(Uuid::new_v4(), "Admin", expires_at).is_admin());
}
