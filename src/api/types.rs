use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{ProfileChanges, Registration};
use crate::{AuthError, MediaAsset, Role, SecretString, SocialLinks, TimelineEntry, User};

// Request DTOs. Every field defaults so a missing field reaches validation
// instead of failing deserialization.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub password: SecretString,
    #[serde(flatten)]
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// The token itself travels in the path.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub password: SecretString,
    pub confirm_password: SecretString,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    pub current_password: SecretString,
    pub new_password: SecretString,
    pub confirm_new_password: SecretString,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    #[serde(flatten)]
    pub links: SocialLinks,
    pub avatar: Option<MediaAsset>,
    pub resume: Option<MediaAsset>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            about_me: req.about_me,
            password: req.password,
            role: Role::User,
            links: req.links,
            avatar: req.avatar,
            resume: req.resume,
        }
    }
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileChanges {
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            about_me: req.about_me,
            links: req.links,
            avatar: req.avatar,
            resume: req.resume,
        }
    }
}

// Response DTOs

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("message", &self.message)
            .field("user", &self.user.id)
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub success: bool,
    pub message: String,
    pub timeline: TimelineEntry,
}

#[derive(Debug, Serialize)]
pub struct TimelinesResponse {
    pub success: bool,
    pub timelines: Vec<TimelineEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::ResetTokenInvalid => "RESET_TOKEN_INVALID",
            AuthError::PasswordMismatch => "PASSWORD_MISMATCH",
            AuthError::IncorrectPassword => "INCORRECT_PASSWORD",
            AuthError::UndeliverableEmail => "UNDELIVERABLE_EMAIL",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::PasswordHashError => "PASSWORD_HASH_ERROR",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AuthError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AuthError::DatabaseError(_) => "DATABASE_ERROR",
        };

        // internal details stay in the logs
        let error = match &err {
            AuthError::DatabaseError(_) | AuthError::ConfigurationError(_) => {
                "Internal server error".to_owned()
            }
            AuthError::ServiceUnavailable(_) => "Service temporarily unavailable".to_owned(),
            _ => err.to_string(),
        };

        ErrorResponse {
            success: false,
            error,
            code: code.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::from(AuthError::InvalidCredentials)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid email or password");
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }

    #[test]
    fn test_internal_details_hidden() {
        let response = ErrorResponse::from(AuthError::DatabaseError("pool exhausted at 10.0.0.3".to_owned()));
        assert!(!response.error.contains("10.0.0.3"));
        assert_eq!(response.code, "DATABASE_ERROR");
    }

    #[test]
    fn test_register_request_ignores_role() {
        let body = r#"{"full_name":"Ada","email":"ada@example.com","password":"analytical","role":"admin","github_url":"https://github.com/ada"}"#;
        let req: RegisterRequest = serde_json::from_str(body).unwrap();
        let registration = Registration::from(req);

        assert_eq!(registration.role, Role::User);
        assert_eq!(registration.links.github_url.as_deref(), Some("https://github.com/ada"));
        assert_eq!(registration.password.expose_secret(), "analytical");
    }

    #[test]
    fn test_missing_fields_default() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }
}
