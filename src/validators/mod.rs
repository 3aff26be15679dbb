//! Input validation for registration, profile and timeline payloads.

pub mod email;
pub mod name;
pub mod password;

pub use email::validate_email;
pub use name::validate_name;
pub use password::{PasswordPolicy, validate_password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmailEmpty,
    EmailTooLong,
    EmailInvalidFormat,
    PasswordEmpty,
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    NameEmpty,
    NameTooLong,
    /// A required field was missing or blank.
    Required(&'static str),
    /// The request body could not be decoded.
    MalformedBody,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailEmpty => write!(f, "Email cannot be empty"),
            Self::EmailTooLong => write!(f, "Email is too long (max 254 characters)"),
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
            Self::PasswordEmpty => write!(f, "Password cannot be empty"),
            Self::PasswordTooShort(min) => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordTooLong(max) => {
                write!(f, "Password is too long (max {max} characters)")
            }
            Self::NameEmpty => write!(f, "Name cannot be empty"),
            Self::NameTooLong => write!(f, "Name is too long (max 100 characters)"),
            Self::Required(field) => write!(f, "{field} is required"),
            Self::MalformedBody => write!(f, "Request body is missing or not valid JSON"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Rejects missing or whitespace-only values.
pub fn require(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::Required(field)),
    }
}
