//! Session trust boundary.
//!
//! Sessions are stateless: the signed token in the `token` cookie is the only
//! session state. A request is admitted in two steps:
//!
//! 1. [`SessionVerifier`] turns the cookie value into a [`RequestContext`]
//!    holding the resolved principal, or fails closed.
//! 2. [`RoleGate`] checks the principal's role against a per-route allow-list.

mod context;
mod cookie;
mod gate;
mod verifier;

pub use context::RequestContext;
pub use cookie::{CookieConfig, SESSION_COOKIE_NAME, SameSite, extract_token};
pub use gate::RoleGate;
pub use verifier::{DEFAULT_LOOKUP_TIMEOUT, SessionVerifier};
