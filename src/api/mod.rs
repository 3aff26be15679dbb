//! HTTP surface: JSON DTOs and, with `axum_api`, the axum router.

mod types;

pub use types::*;

#[cfg(feature = "axum_api")]
pub mod axum;
