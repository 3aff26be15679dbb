use async_trait::async_trait;

use super::AuthEvent;

/// Receives dispatched events.
///
/// The registry asks [`accepts`](Self::accepts) before awaiting
/// [`handle`](Self::handle), so a listener that only cares about a few
/// events never sees the rest.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    fn accepts(&self, _event: &AuthEvent) -> bool {
        true
    }

    async fn handle(&self, event: &AuthEvent);
}
