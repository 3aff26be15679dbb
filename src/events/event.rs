use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Events emitted by portfolio actions and handlers.
///
/// Dispatch is a no-op until listeners are registered with
/// [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum AuthEvent {
    // account
    UserRegistered {
        user_id: Uuid,
        email: String,
        at: DateTime<Utc>,
    },
    ProfileUpdated {
        user_id: Uuid,
        at: DateTime<Utc>,
    },

    // session
    LoginSuccess {
        user_id: Uuid,
        email: String,
        at: DateTime<Utc>,
    },
    LoginFailed {
        email: String,
        reason: String,
        at: DateTime<Utc>,
    },
    LogoutSuccess {
        user_id: Uuid,
        at: DateTime<Utc>,
    },

    // password
    PasswordChanged {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    PasswordResetRequested {
        email: String,
        at: DateTime<Utc>,
    },
    PasswordResetCompleted {
        user_id: Uuid,
        at: DateTime<Utc>,
    },

    // content
    TimelineEntryAdded {
        entry_id: Uuid,
        by: Uuid,
        at: DateTime<Utc>,
    },
    TimelineEntryDeleted {
        entry_id: Uuid,
        by: Uuid,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Dot-separated event name for logs and spans.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user.registered",
            Self::ProfileUpdated { .. } => "user.profile_updated",
            Self::LoginSuccess { .. } => "auth.login.success",
            Self::LoginFailed { .. } => "auth.login.failed",
            Self::LogoutSuccess { .. } => "auth.logout.success",
            Self::PasswordChanged { .. } => "auth.password.changed",
            Self::PasswordResetRequested { .. } => "auth.password.reset_requested",
            Self::PasswordResetCompleted { .. } => "auth.password.reset_completed",
            Self::TimelineEntryAdded { .. } => "timeline.added",
            Self::TimelineEntryDeleted { .. } => "timeline.deleted",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserRegistered { at, .. }
            | Self::ProfileUpdated { at, .. }
            | Self::LoginSuccess { at, .. }
            | Self::LoginFailed { at, .. }
            | Self::LogoutSuccess { at, .. }
            | Self::PasswordChanged { at, .. }
            | Self::PasswordResetRequested { at, .. }
            | Self::PasswordResetCompleted { at, .. }
            | Self::TimelineEntryAdded { at, .. }
            | Self::TimelineEntryDeleted { at, .. } => *at,
        }
    }
}
