use chrono::Utc;
use uuid::Uuid;

use crate::events::{AuthEvent, dispatch};
use crate::{AuthError, NewTimelineEntry, TimelineEntry, TimelineRepository};

pub struct AddTimelineEntryAction<T: TimelineRepository> {
    timeline_repository: T,
}

impl<T: TimelineRepository> AddTimelineEntryAction<T> {
    pub fn new(timeline_repository: T) -> Self {
        Self {
            timeline_repository,
        }
    }

    pub async fn execute(
        &self,
        author: Uuid,
        payload: NewTimelineEntry,
    ) -> Result<TimelineEntry, AuthError> {
        let entry = self.timeline_repository.create(payload.into_entry()?).await?;

        dispatch(AuthEvent::TimelineEntryAdded {
            entry_id: entry.id,
            by: author,
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"timeline entry added\" entry_id={} by={author}", entry.id);

        Ok(entry)
    }
}

pub struct DeleteTimelineEntryAction<T: TimelineRepository> {
    timeline_repository: T,
}

impl<T: TimelineRepository> DeleteTimelineEntryAction<T> {
    pub fn new(timeline_repository: T) -> Self {
        Self {
            timeline_repository,
        }
    }

    pub async fn execute(&self, author: Uuid, entry_id: Uuid) -> Result<(), AuthError> {
        self.timeline_repository.delete(entry_id).await?;

        dispatch(AuthEvent::TimelineEntryDeleted {
            entry_id,
            by: author,
            at: Utc::now(),
        })
        .await;

        log::info!(target: "portfolio_auth", "msg=\"timeline entry deleted\" entry_id={entry_id} by={author}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockTimelineRepository;
    use crate::validators::ValidationError;

    #[tokio::test]
    async fn test_add_then_delete() {
        let repo = MockTimelineRepository::new();
        let author = Uuid::new_v4();

        let entry = AddTimelineEntryAction::new(repo.clone())
            .execute(
                author,
                NewTimelineEntry {
                    title: "MSc".to_owned(),
                    description: "Distributed systems".to_owned(),
                    grade: "Distinction".to_owned(),
                    from: Some(Utc::now()),
                    to: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let delete = DeleteTimelineEntryAction::new(repo.clone());
        delete.execute(author, entry.id).await.unwrap();
        assert_eq!(
            delete.execute(author, entry.id).await.unwrap_err(),
            AuthError::NotFound
        );
    }

    #[tokio::test]
    async fn test_add_rejects_incomplete_payload() {
        let repo = MockTimelineRepository::new();
        let result = AddTimelineEntryAction::new(repo.clone())
            .execute(Uuid::new_v4(), NewTimelineEntry::default())
            .await;

        assert_eq!(
            result.unwrap_err(),
            AuthError::Validation(ValidationError::Required("title"))
        );
        assert!(repo.list().await.unwrap().is_empty());
    }
}
