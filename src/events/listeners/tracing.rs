use async_trait::async_trait;

use crate::events::{AuthEvent, Listener};

/// Emits each event as a `tracing` event. Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &AuthEvent) {
        tracing::info!(
            target: "portfolio_auth::events",
            event_name = event.name(),
            ?event,
            "portfolio event"
        );
    }
}
