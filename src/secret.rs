//! Redacting wrapper for passwords, tokens and signing keys.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string that never shows up in `Debug` or `Display` output.
///
/// ```rust
/// use portfolio_auth::SecretString;
///
/// let key = SecretString::new("jwt-signing-key");
/// assert_eq!(format!("{key:?}"), "SecretString([REDACTED])");
/// assert_eq!(key.expose_secret(), "jwt-signing-key");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the raw value. Only call this at the point of use
    /// (hashing, signing, writing a cookie).
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // session tokens are returned in login responses
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let secret = SecretString::new("hunter2hunter2");
        assert_eq!(format!("{secret:?}"), "SecretString([REDACTED])");
        assert_eq!(format!("{secret}"), "[REDACTED]");
    }

    #[test]
    fn test_redacted_inside_derived_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct LoginForm {
            email: String,
            password: SecretString,
        }

        let form = LoginForm {
            email: "owner@example.com".to_owned(),
            password: SecretString::new("hunter2hunter2"),
        };
        let printed = format!("{form:?}");
        assert!(printed.contains("owner@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_len_and_empty() {
        assert!(SecretString::default().is_empty());
        assert_eq!(SecretString::from("abc").len(), 3);
        assert_eq!(SecretString::from("abc".to_owned()).as_bytes(), b"abc");
    }

    #[test]
    fn test_serde_uses_raw_value() {
        let secret = SecretString::new("signed.jwt.value");
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"signed.jwt.value\"");

        let back: SecretString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);
    }
}
