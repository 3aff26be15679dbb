//! Event hooks for account and session activity.
//!
//! Actions always dispatch events; with no listeners registered, dispatch does
//! nothing.
//!
//! ```rust,ignore
//! use portfolio_auth::register_event_listeners;
//! use portfolio_auth::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```
//!
//! Implement [`Listener`] for anything else (metrics, alerts):
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use portfolio_auth::events::{AuthEvent, Listener};
//!
//! struct FailedLoginCounter;
//!
//! #[async_trait]
//! impl Listener for FailedLoginCounter {
//!     fn accepts(&self, event: &AuthEvent) -> bool {
//!         matches!(event, AuthEvent::LoginFailed { .. })
//!     }
//!
//!     async fn handle(&self, _event: &AuthEvent) {
//!         // bump a counter
//!     }
//! }
//! ```
//!
//! Or scope a listener by event name with
//! [`EventRegistry::listen_to`], e.g. `registry.listen_to("timeline.", audit)`.

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AuthEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
