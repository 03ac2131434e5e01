//! Event registry
//!
//! Maps event keys to ordered handler lists. Emission runs handlers one at a
//! time in registration order, awaiting each before starting the next.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use gatecord_core::EventData;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Boxed async event handler
pub type Handler = Arc<dyn Fn(Arc<EventData>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Identifies one registration, for removal with [`EventRegistry::off`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Publishes decoded dispatch events
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Deliver `data` to every subscriber of `event`
    async fn emit(&self, event: &str, data: Arc<EventData>);
}

#[derive(Clone)]
struct Subscription {
    id: HandlerId,
    handler: Handler,
    once: bool,
}

/// Per-event handler lists
///
/// Event keys are case-insensitive; `MESSAGE_CREATE` and `message_create` name the same event.
#[derive(Default)]
pub struct EventRegistry {
    handlers: RwLock<HashMap<String, Vec<Subscription>>>,
    next_id: AtomicU64,
}

impl EventRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `event`
    pub fn on<F, Fut>(&self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(Arc<EventData>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribe(event.into(), box_handler(handler), false)
    }

    /// Append a handler that runs for the next emission of `event` only
    pub fn once<F, Fut>(&self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(Arc<EventData>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribe(event.into(), box_handler(handler), true)
    }

    /// Remove one handler, or every handler for `event` when `id` is `None`
    ///
    /// Returns the number of handlers removed.
    pub fn off(&self, event: &str, id: Option<HandlerId>) -> usize {
        let key = normalize(event);
        let mut handlers = self.handlers.write();

        let removed = match id {
            None => handlers.remove(&key).map_or(0, |subs| subs.len()),
            Some(id) => handlers.get_mut(&key).map_or(0, |subs| {
                let before = subs.len();
                subs.retain(|sub| sub.id != id);
                before - subs.len()
            }),
        };

        if handlers.get(&key).is_some_and(Vec::is_empty) {
            handlers.remove(&key);
        }
        removed
    }

    /// Number of handlers registered for `event`
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .read()
            .get(&normalize(event))
            .map_or(0, Vec::len)
    }

    /// Invoke the handlers registered for `event` in order
    ///
    /// The handler list is snapshotted when emission starts. Handlers removed
    /// while it runs are skipped, handlers added while it runs wait for the next
    /// emission. A `once` handler is removed before it is invoked. Returns the
    /// number of handlers invoked.
    pub async fn emit(&self, event: &str, data: Arc<EventData>) -> usize {
        let key = normalize(event);
        let snapshot = match self.handlers.read().get(&key) {
            Some(subs) => subs.clone(),
            None => return 0,
        };

        let mut invoked = 0;
        for sub in snapshot {
            let live = if sub.once {
                self.claim(&key, sub.id)
            } else {
                self.is_registered(&key, sub.id)
            };
            if !live {
                continue;
            }

            (sub.handler)(Arc::clone(&data)).await;
            invoked += 1;
        }

        tracing::trace!(event = %key, handlers = invoked, "Event emitted");
        invoked
    }

    fn subscribe(&self, event: String, handler: Handler, once: bool) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .entry(normalize(&event))
            .or_default()
            .push(Subscription { id, handler, once });
        id
    }

    fn is_registered(&self, key: &str, id: HandlerId) -> bool {
        self.handlers
            .read()
            .get(key)
            .is_some_and(|subs| subs.iter().any(|sub| sub.id == id))
    }

    /// Remove a `once` registration, reporting whether this caller removed it
    fn claim(&self, key: &str, id: HandlerId) -> bool {
        self.off(key, Some(id)) == 1
    }
}

#[async_trait]
impl Emitter for EventRegistry {
    async fn emit(&self, event: &str, data: Arc<EventData>) {
        EventRegistry::emit(self, event, data).await;
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let counts: HashMap<&str, usize> = handlers
            .iter()
            .map(|(event, subs)| (event.as_str(), subs.len()))
            .collect();
        f.debug_struct("EventRegistry")
            .field("handlers", &counts)
            .finish()
    }
}

fn box_handler<F, Fut>(handler: F) -> Handler
where
    F: Fn(Arc<EventData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |data| -> BoxFuture<'static, ()> { Box::pin(handler(data)) })
}

fn normalize(event: &str) -> String {
    event.to_ascii_lowercase()
}
