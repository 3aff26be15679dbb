use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AuthError;

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal id.
    pub sub: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl SessionClaims {
    /// Parses `sub` back into a principal id.
    pub fn subject_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id() {
        let id = Uuid::new_v4();
        let claims = SessionClaims {
            sub: id.to_string(),
            iat: 0,
            exp: 1,
            iss: None,
        };
        assert_eq!(claims.subject_id().unwrap(), id);

        let bad = SessionClaims {
            sub: "67cda4986b859466f3f1ec68".to_owned(),
            ..claims
        };
        assert_eq!(bad.subject_id().unwrap_err(), AuthError::MalformedToken);
    }

    #[test]
    fn test_issuer_omitted_when_absent() {
        let claims = SessionClaims {
            sub: "x".to_owned(),
            iat: 0,
            exp: 1,
            iss: None,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("iss").is_none());
    }
}
