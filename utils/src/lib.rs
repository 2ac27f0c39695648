//! Synchronous observer registry, mirroring `nimiq-utils::observer::Notifier`.
//!
//! Subscribers register a closure; `notify` invokes every registered closure
//! in registration order, synchronously, from the caller's own stack. Per
//! the design notes, subscribers must not re-enter the engine from their
//! handler - doing so against a single-consumer serializer would deadlock.

pub struct Notifier<T> {
    listeners: Vec<(u64, Box<dyn FnMut(&T) + Send>)>,
    next_id: u64,
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Notifier { listeners: Vec::new(), next_id: 0 }
    }
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns a subscription id that can later be
    /// passed to [`Notifier::unsubscribe`].
    pub fn subscribe<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn notify(&mut self, event: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}
