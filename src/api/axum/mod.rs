//! Axum router, middleware and handlers.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use portfolio_auth::api::axum::{AppState, router};
//! use portfolio_auth::deliverability::AcceptAllVerifier;
//! use portfolio_auth::mail::LogMailSender;
//! use portfolio_auth::{MockTimelineRepository, MockUserRepository, PortfolioConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(
//!     PortfolioConfig::from_env()?,
//!     MockUserRepository::new(),
//!     MockTimelineRepository::new(),
//!     Arc::new(LogMailSender),
//!     Arc::new(AcceptAllVerifier),
//! )?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::{ApiJson, AppError};
pub use middleware::{CurrentUser, authenticate, require_roles, session_token};
pub use routes::{AppState, router, timeline_routes, user_routes};
