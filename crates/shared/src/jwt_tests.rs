use super::*;

fn create_test_service() -> JwtService {
    JwtService::new(&JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expiry_secs: 900,
    })
}

#[test]
fn test_generate_and_validate_token() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service.generate_access_token(user_id, "admin").unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, "admin");
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let other = JwtService::new(&JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expiry_secs: 900,
    });
    let token = other.generate_access_token(Uuid::new_v4(), "admin").unwrap();

    assert!(create_test_service().validate_token(&token).is_err());
}

#[test]
fn test_expired_token() {
    let service = create_test_service();
    let claims = Claims::new(
        Uuid::new_v4(),
        "admin",
        Utc::now() - Duration::minutes(10),
    );
    let token = encode(&Header::default(), &claims, &service.encoding_key).unwrap();

    assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
}
