//! Resume and education timeline.

mod entry;
#[cfg(any(test, feature = "mocks"))]
mod mock;

use async_trait::async_trait;
use uuid::Uuid;

pub use entry::{NewTimelineEntry, TimelineEntry, TimelineSpan};
#[cfg(any(test, feature = "mocks"))]
pub use mock::MockTimelineRepository;

use crate::AuthError;

#[async_trait]
pub trait TimelineRepository: Send + Sync {
    async fn create(&self, entry: TimelineEntry) -> Result<TimelineEntry, AuthError>;
    /// Returns `NotFound` if no entry has this id.
    async fn delete(&self, id: Uuid) -> Result<(), AuthError>;
    async fn list(&self) -> Result<Vec<TimelineEntry>, AuthError>;
}
