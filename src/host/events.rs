//! Host event subscription.
//!
//! [`EventSource`] is the observer side of the host: components register async
//! listeners against an [`EventKind`] and the host's dispatch loop calls
//! [`EventSource::emit`] when a message finishes rendering.

use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, trace};

use crate::host::{EventKind, MessageId};

type Listener = Box<dyn Fn(MessageId) -> LocalBoxFuture<'static, ()>>;

/// Registry of listeners keyed by event kind.
///
/// Listeners run sequentially, in registration order, and each one is awaited to
/// completion before the next starts.
///
/// # Examples
///
/// ```text
/// let mut events = EventSource::new();
/// events.on(EventKind::UserMessageRendered, |id| async move {
///     println!("message {id} rendered");
/// });
/// events.emit(EventKind::UserMessageRendered, 0).await;
/// ```
#[derive(Default)]
pub struct EventSource {
    listeners: Vec<(EventKind, Listener)>,
}

impl EventSource {
    /// Creates an event source without listeners.
    pub fn new() -> Self {
        EventSource {
            listeners: Vec::new(),
        }
    }

    /// Registers `listener` for events of `kind`.
    pub fn on<F, Fut>(&mut self, kind: EventKind, listener: F)
    where
        F: Fn(MessageId) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        debug!("listener registered for {:?}", kind);
        self.listeners
            .push((kind, Box::new(move |id| listener(id).boxed_local())));
    }

    /// Runs every listener registered for `kind` with the message identifier.
    pub async fn emit(&self, kind: EventKind, id: MessageId) {
        trace!("emit {:?} for message {}", kind, id);

        for (_, listener) in self.listeners.iter().filter(|(k, _)| *k == kind) {
            listener(id).await;
        }
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }
}
