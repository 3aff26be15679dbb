use std::sync::OnceLock;

use async_trait::async_trait;

use super::{AuthEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Restricts a listener to events whose [`name`](AuthEvent::name) starts
/// with `prefix`.
struct Scoped<L> {
    prefix: &'static str,
    inner: L,
}

#[async_trait]
impl<L: Listener> Listener for Scoped<L> {
    fn accepts(&self, event: &AuthEvent) -> bool {
        event.name().starts_with(self.prefix) && self.inner.accepts(event)
    }

    async fn handle(&self, event: &AuthEvent) {
        self.inner.handle(event).await;
    }
}

/// Listeners in registration order.
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Registers `listener` for one family of events only, e.g.
    /// `"auth.password"` or `"timeline."`.
    pub fn listen_to(&mut self, prefix: &'static str, listener: impl Listener) -> &mut Self {
        self.listen(Scoped {
            prefix,
            inner: listener,
        })
    }

    async fn dispatch(&self, event: &AuthEvent) {
        for listener in self.listeners.iter().filter(|l| l.accepts(event)) {
            listener.handle(event).await;
        }
    }
}

/// Installs the process-wide listeners. Call once at startup.
///
/// Only the first call takes effect; later calls log a warning.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "portfolio_auth",
            "msg=\"event listeners already registered, ignoring\""
        );
    }
}

/// Awaits every registered listener that accepts `event`, in turn.
pub async fn dispatch(event: AuthEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}
