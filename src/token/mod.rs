//! Signed, time-bounded session tokens.
//!
//! Tokens are HS256 JWTs carrying the principal id (`sub`), issue time and
//! expiry. Nothing is stored server-side: rotating the secret invalidates every
//! outstanding session.
//!
//! ```rust
//! use portfolio_auth::token::{SessionTokenConfig, TokenCodec};
//! use uuid::Uuid;
//!
//! let config = SessionTokenConfig::new("a-signing-secret-of-at-least-32-bytes")
//!     .unwrap()
//!     .with_expiry(chrono::Duration::days(7));
//! let codec = TokenCodec::new(config);
//!
//! let id = Uuid::new_v4();
//! let token = codec.issue(id).unwrap();
//! assert_eq!(codec.verify(token.token.expose_secret()).unwrap(), id);
//! ```

mod claims;
mod codec;
mod config;

pub use claims::SessionClaims;
pub use codec::{SessionToken, TokenCodec};
pub use config::{MIN_SECRET_LENGTH, SessionTokenConfig};
