use crate::Error;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, ThreadId};
use tracing::warn;

type Observer<E> = Arc<dyn Fn(&E) -> Result<(), Error> + Send + Sync>;

/// Outcome of delivering one event to every subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Observers that returned `Ok`.
    pub delivered: usize,
    /// Observers that returned an error or panicked.
    pub failed: usize,
}

/// An ordered list of change observers.
///
/// Observers are called synchronously in subscription order. Each call is
/// isolated: an observer returning `Err` or panicking is logged and skipped,
/// and the rest are still notified. There is no unsubscribe.
///
/// Changes go through [`Subscribers::publish`], which serializes writers and
/// delivers events in the order the changes were made.
pub struct Subscribers<E> {
    observers: RwLock<Vec<Observer<E>>>,
    writer: Mutex<()>,
    // Thread currently applying a change and draining `pending`.
    owner: Mutex<Option<ThreadId>>,
    pending: Mutex<VecDeque<E>>,
}

/// Clears the writer's ownership even if a change panics.
struct OwnerGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            writer: Mutex::new(()),
            owner: Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Applies `change` and delivers the event it produces.
    ///
    /// Writers on other threads wait until every queued event has been
    /// delivered. A change made by an observer on the notifying thread is
    /// applied at once; its event is queued behind the one being delivered
    /// and the nested call returns without waiting for it.
    pub fn publish<T, X, F>(&self, change: F) -> Result<T, X>
    where
        F: FnOnce() -> Result<(T, E), X>,
    {
        let current = thread::current().id();
        if *self.owner.lock().unwrap_or_else(PoisonError::into_inner) == Some(current) {
            let (value, event) = change()?;
            self.enqueue(event);
            return Ok(value);
        }

        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = Some(current);
        let _owner = OwnerGuard(&self.owner);

        let (value, event) = change()?;
        self.enqueue(event);

        while let Some(event) = self.next_pending() {
            self.notify(&event);
        }

        Ok(value)
    }

    fn enqueue(&self, event: E) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event);
    }

    fn next_pending(&self) -> Option<E> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&E) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every observer subscribed at the time of the call.
    pub fn notify(&self, event: &E) -> NotifyReport {
        // Snapshot so observers may subscribe re-entrantly.
        let observers: Vec<Observer<E>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut report = NotifyReport::default();
        for (position, observer) in observers.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| observer(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    warn!(position, error = %err, "observer rejected notification");
                    report.failed += 1;
                }
                Err(_) => {
                    warn!(position, "observer panicked during notification");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("observers", &self.len())
            .finish_non_exhaustive()
    }
}
