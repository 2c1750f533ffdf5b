use crate::{Error, Message, Subscribers};
use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Raised to store observers after every append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// A message was appended at `index` (zero-based, oldest first).
    Appended { index: usize },
}

/// Append-only, ordered log of messages.
///
/// Observers receive events in append order. The log itself is unlocked
/// while observers run; an observer reading [`MessageStore::all_messages`]
/// always sees the message it is being notified about.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: RwLock<Vec<Arc<Message>>>,
    subscribers: Subscribers<StoreEvent>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and notifies every observer before returning.
    ///
    /// An observer may append in turn (an auto-reply, say); that message is
    /// stored at once and announced after the current notification.
    pub fn append(
        &self,
        sender: &str,
        receiver: &str,
        plaintext: &str,
        ciphertext: String,
    ) -> Arc<Message> {
        let message = Arc::new(Message::new(
            sender.to_string(),
            receiver.to_string(),
            plaintext.to_string(),
            ciphertext,
        ));

        let Ok(message) = self.subscribers.publish(|| {
            let index = {
                let mut messages = self.messages.write().unwrap_or_else(PoisonError::into_inner);
                messages.push(Arc::clone(&message));
                messages.len() - 1
            };
            debug!(index, "message appended");
            Ok::<_, Infallible>((message, StoreEvent::Appended { index }))
        });

        message
    }

    /// Every message, oldest first.
    pub fn all_messages(&self) -> Vec<Arc<Message>> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, index: usize) -> Option<Arc<Message>> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to [`StoreEvent`]s.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&StoreEvent) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.subscribers.subscribe(observer);
    }
}
