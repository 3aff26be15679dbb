//! Credential store traits and data types.
//!
//! The auth core only reads principals through [`UserRepository`]. Implement it
//! over your database of choice; [`MockUserRepository`] keeps everything in
//! memory and is available with the `mocks` feature.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`User`] | Principal plus portfolio profile |
//! | [`Role`] | Flat account role checked by the role gate |
//! | [`NewUser`] / [`ProfileUpdate`] | Write payloads |
//! | [`MediaAsset`] | Reference to an already-hosted avatar or resume |

mod role;
mod user;

#[cfg(any(test, feature = "mocks"))]
mod user_mock;

pub use role::Role;
pub use user::{MediaAsset, NewUser, ProfileUpdate, SocialLinks, User, UserRepository};

#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
