//! Bounded Event Buffer

use crate::WafEvent;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Default capacity, matching what a small dashboard keeps on screen
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fixed-capacity event ring with exclusive-access mutation.
///
/// `push` and `snapshot` take the internal lock, so the buffer can be
/// shared by reference between a reporting thread and a reader. When full,
/// the oldest event is evicted.
pub struct EventBuffer {
    events: Mutex<VecDeque<WafEvent>>,
    capacity: usize,
    total_recorded: Mutex<u64>,
}

impl EventBuffer {
    /// Create a buffer holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            total_recorded: Mutex::new(0),
        }
    }

    /// Create a buffer with the default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Append an event, evicting the oldest when at capacity.
    pub fn push(&self, event: WafEvent) {
        let mut events = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while events.len() >= self.capacity {
            events.pop_front();
        }
        debug!(path = %event.path, action = event.action.as_str(), "event recorded");
        events.push_back(event);

        if let Ok(mut total) = self.total_recorded.lock() {
            *total += 1;
        }
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<WafEvent> {
        match self.events.lock() {
            Ok(events) => events.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of events retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events ever recorded, evicted ones included.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded.lock().map(|t| *t).unwrap_or(0)
    }
}
