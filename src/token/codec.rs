use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::{SessionClaims, SessionTokenConfig};
use crate::{AuthError, SecretString};

/// An issued session token.
///
/// Only the encoded `token` travels to the client; the other fields mirror its
/// claims for the caller's convenience (cookie expiry, responses).
#[derive(Clone)]
pub struct SessionToken {
    pub token: SecretString,
    pub subject_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("token", &"[REDACTED]")
            .field("subject_id", &self.subject_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Issues and verifies session tokens under a single HS256 secret.
#[derive(Clone)]
pub struct TokenCodec {
    config: SessionTokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: SessionTokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is exact: a token is dead once now > exp
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(ref iss) = config.issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issues a token for `principal_id` that expires after the configured lifetime.
    pub fn issue(&self, principal_id: Uuid) -> Result<SessionToken, AuthError> {
        self.issue_at(principal_id, Utc::now())
    }

    /// Issues a token as if the clock read `issued_at`.
    pub fn issue_at(
        &self,
        principal_id: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        let expires_at = issued_at + self.config.expiry;

        let claims = SessionClaims {
            sub: principal_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AuthError::ConfigurationError(format!("token signing failed: {e}")))?;

        Ok(SessionToken {
            token: SecretString::new(token),
            subject_id: principal_id,
            issued_at,
            expires_at,
        })
    }

    /// Verifies a token and returns the principal id it was issued for.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` once the expiry has passed, whether or not the signature holds
    /// - `InvalidSignature` if the signature, algorithm or issuer does not match
    /// - `MalformedToken` if the token cannot be parsed at all
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        self.decode(token)?.subject_id()
    }

    /// Like [`verify`](Self::verify) but returns every claim.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => Err(self.classify(token, err.kind())),
        }
    }

    pub fn expiry(&self) -> chrono::Duration {
        self.config.expiry
    }

    fn classify(&self, token: &str, kind: &ErrorKind) -> AuthError {
        match kind {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature => {
                if self.is_past_expiry(token) {
                    AuthError::TokenExpired
                } else {
                    AuthError::InvalidSignature
                }
            }
            _ => AuthError::MalformedToken,
        }
    }

    /// Reads `exp` without trusting the signature. Used only to rank a
    /// rejection, never to accept a token.
    fn is_past_expiry(&self, token: &str) -> bool {
        let mut peek = Validation::new(Algorithm::HS256);
        peek.insecure_disable_signature_validation();
        peek.validate_exp = false;
        peek.validate_aud = false;
        peek.required_spec_claims.clear();

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &peek)
            .map(|data| data.claims.exp < Utc::now().timestamp())
            .unwrap_or(false)
    }
}
