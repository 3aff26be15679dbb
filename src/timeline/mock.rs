#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::{TimelineEntry, TimelineRepository};
use crate::AuthError;

#[derive(Clone, Default)]
pub struct MockTimelineRepository {
    pub entries: Arc<Mutex<Vec<TimelineEntry>>>,
}

impl MockTimelineRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimelineRepository for MockTimelineRepository {
    async fn create(&self, entry: TimelineEntry) -> Result<TimelineEntry, AuthError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<TimelineEntry>, AuthError> {
        Ok(self.entries.lock().unwrap().clone())
    }
}
