//! Token and domain enum tests

use chrono::Utc;

use ludotheca_server::models::{
    loan::{BorrowType, LoanStatus},
    resource::{ResourceKind, ResourceStatus},
    user::UserClaims,
};

const SECRET: &str = "test-secret";

fn claims_for(user_id: i64, lifetime_secs: i64) -> UserClaims {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "test@example.com".to_string(),
        user_id,
        iat: now,
        exp: now + lifetime_secs,
    }
}

#[test]
fn test_token_roundtrip() {
    let claims = claims_for(42, 3600);
    let token = claims.create_token(SECRET).expect("Failed to create token");

    let decoded = UserClaims::from_token(&token, SECRET).expect("Failed to decode token");
    assert_eq!(decoded.user_id, 42);
    assert_eq!(decoded.sub, "test@example.com");
}

#[test]
fn test_expired_token_is_rejected() {
    let claims = claims_for(42, -3600);
    let token = claims.create_token(SECRET).expect("Failed to create token");

    assert!(UserClaims::from_token(&token, SECRET).is_err());
}

#[test]
fn test_token_with_wrong_secret_is_rejected() {
    let claims = claims_for(42, 3600);
    let token = claims.create_token(SECRET).expect("Failed to create token");

    assert!(UserClaims::from_token(&token, "other-secret").is_err());
}

#[test]
fn test_resource_status_string_roundtrip() {
    for status in [
        ResourceStatus::Available,
        ResourceStatus::Borrowed,
        ResourceStatus::Disabled,
    ] {
        assert_eq!(status.as_str().parse::<ResourceStatus>().unwrap(), status);
    }

    assert!("lost".parse::<ResourceStatus>().is_err());
    assert_eq!(ResourceStatus::default(), ResourceStatus::Available);
}

#[test]
fn test_resource_kind_string_roundtrip() {
    for kind in [ResourceKind::Book, ResourceKind::Game] {
        assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
    }

    assert!("vinyl".parse::<ResourceKind>().is_err());
}

#[test]
fn test_loan_status_string_roundtrip() {
    for status in [LoanStatus::Active, LoanStatus::Returned] {
        assert_eq!(status.as_str().parse::<LoanStatus>().unwrap(), status);
    }

    assert!("overdue".parse::<LoanStatus>().is_err());
}

#[test]
fn test_borrow_type_json_names() {
    let take_away: BorrowType = serde_json::from_str("\"take_away\"").unwrap();
    assert_eq!(take_away, BorrowType::TakeAway);

    let in_place: BorrowType = serde_json::from_str("\"in_place\"").unwrap();
    assert_eq!(in_place, BorrowType::InPlace);

    assert!(serde_json::from_str::<BorrowType>("\"forever\"").is_err());
}
