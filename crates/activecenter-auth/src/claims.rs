use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::{Role, UserStatus};

/// JWT claims for access tokens.
///
/// Carries everything the guard needs to build a [`Principal`](crate::Principal)
/// without a storage lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "member@club.test".to_string(),
            role: Role::User,
            status: UserStatus::Active,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""role":"user""#));
        assert!(serialized.contains(r#""status":"active""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"u-1","email":"a@club.test","role":"admin","status":"banned","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.status, UserStatus::Banned);
        assert_eq!(claims.exp, 9999999999);
    }
}
