use crate::core::config::QueueConfig;
use crate::core::error::ClosedError;
use crate::core::stats::QueueStats;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Outcome of a blocking removal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Popped<T> {
    /// Head element of the queue
    Item(T),
    /// Queue is empty and closed: nothing will ever arrive, stop consuming
    Closed,
}

impl<T> Popped<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Popped::Item(item) => Some(item),
            Popped::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Popped::Closed)
    }
}

/// Everything guarded by the single lock: the elements, the closed flag and the counters
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
    pushed: u64,
    popped: u64,
    rejected: u64,
}

impl<T> State<T> {
    fn pop_front(&mut self) -> Option<T> {
        let item = self.items.pop_front()?;
        self.popped += 1;
        // -- post op assertion: length tracks pushes minus pops
        debug_assert_eq!(self.items.len() as u64, self.pushed - self.popped);
        Some(item)
    }

    fn ready(&self) -> bool {
        !self.items.is_empty() || self.closed
    }
}

/// Thread-safe FIFO queue with a one-way close signal.
///
/// Producers `push` until they are done and then `close` the queue once.
/// Consumers loop on `wait_and_pop`, which blocks while the queue is empty and
/// open, keeps returning items after close until the queue is drained, and
/// then returns [`Popped::Closed`].
///
/// Inserting into a closed queue is refused with [`ClosedError`], which hands
/// the item back. Closing marks the end of production, so a late push is a
/// caller bug that should surface rather than vanish into a queue nobody will
/// drain.
pub struct ConcurrentQueue<T> {
    name: String,
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> ConcurrentQueue<T> {
    /// Create a new, empty and open queue
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            name: config.name,
            state: Mutex::new(State {
                items: VecDeque::with_capacity(config.initial_capacity),
                closed: false,
                pushed: 0,
                popped: 0,
                rejected: 0,
            }),
            available: Condvar::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // No operation panics between mutations, so a poisoned guard still holds consistent state
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item` at the tail and wake one waiting consumer
    pub fn push(&self, item: T) -> Result<(), ClosedError<T>> {
        {
            let mut state = self.lock();
            if state.closed {
                state.rejected += 1;
                warn!(queue = %self.name, "push rejected, queue is closed");
                return Err(ClosedError(item));
            }
            state.items.push_back(item);
            state.pushed += 1;
            trace!(queue = %self.name, len = state.items.len(), "pushed");
        }

        self.available.notify_one();
        Ok(())
    }

    /// Build the element with `make` and append it.
    ///
    /// `make` runs under the lock and only while the queue is open; on a
    /// closed queue it is dropped without being called.
    pub fn emplace<F>(&self, make: F) -> Result<(), ClosedError<()>>
    where
        F: FnOnce() -> T,
    {
        {
            let mut state = self.lock();
            if state.closed {
                state.rejected += 1;
                warn!(queue = %self.name, "emplace rejected, queue is closed");
                return Err(ClosedError(()));
            }
            state.items.push_back(make());
            state.pushed += 1;
            trace!(queue = %self.name, len = state.items.len(), "emplaced");
        }

        self.available.notify_one();
        Ok(())
    }

    /// Remove the head element if there is one. Never blocks, whether closed or not.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Block until an element is available or the queue is empty and closed
    pub fn wait_and_pop(&self) -> Popped<T> {
        let guard = self.lock();
        let mut state = self
            .available
            .wait_while(guard, |state| !state.ready())
            .unwrap_or_else(PoisonError::into_inner);

        match state.pop_front() {
            Some(item) => Popped::Item(item),
            None => {
                trace!(queue = %self.name, "drained and closed");
                Popped::Closed
            }
        }
    }

    /// Like [`wait_and_pop`](Self::wait_and_pop) but gives up after `timeout`.
    ///
    /// Returns `None` if the deadline passes while the queue is still empty and open.
    pub fn wait_and_pop_timeout(&self, timeout: Duration) -> Option<Popped<T>> {
        let guard = self.lock();
        let (mut state, _) = self
            .available
            .wait_timeout_while(guard, timeout, |state| !state.ready())
            .unwrap_or_else(PoisonError::into_inner);

        // Re-check the predicate rather than trusting the timeout flag
        if let Some(item) = state.pop_front() {
            return Some(Popped::Item(item));
        }
        if state.closed {
            return Some(Popped::Closed);
        }
        None
    }

    /// Take every pending element at once, oldest first
    pub fn drain(&self) -> Vec<T> {
        let mut state = self.lock();
        let items: Vec<T> = state.items.drain(..).collect();
        state.popped += items.len() as u64;
        items
    }

    /// Mark the end of production and wake every waiter. Closing twice is a no-op.
    pub fn close(&self) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            debug!(queue = %self.name, pending = state.items.len(), "closed");
        }

        self.available.notify_all();
    }

    /// Snapshot only: another thread may change the answer right after it is read
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.lock();
        QueueStats {
            name: self.name.clone(),
            pushed: state.pushed,
            popped: state.popped,
            rejected: state.rejected,
            len: state.items.len(),
            closed: state.closed,
        }
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle held by every producer and consumer
pub type SafeQueue<T> = Arc<ConcurrentQueue<T>>;
