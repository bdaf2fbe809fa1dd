use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = EnrollmentId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(id.to_string(), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = FeeItemId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(FeeItemId::from_str("invalid").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&PaymentId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
