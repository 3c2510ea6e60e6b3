//! Generation-tagged queue of delayed tasks.
//!
//! Every task records the session generation that was current when it was
//! scheduled. The queue itself only orders tasks by due time; whoever drains
//! it compares the recorded generation against the live one and drops the
//! task if the attempt that scheduled it has been superseded. Owners that
//! know a generation has ended prune it with
//! [`DeferredQueue::retain_generation`].

use std::time::Duration;

/// A task waiting for its due time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deferred<T> {
    /// Virtual time at which the task fires.
    pub due: Duration,
    /// Session generation at schedule time.
    pub generation: u64,
    pub task: T,
}

impl<T> Deferred<T> {
    /// Was this task scheduled by the attempt identified by `generation`?
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Pending tasks ordered by due time; ties fire in scheduling order.
#[derive(Clone, Debug)]
pub struct DeferredQueue<T> {
    pending: Vec<Deferred<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` at `due`, tagged with `generation`.
    pub fn schedule(&mut self, due: Duration, generation: u64, task: T) {
        // Insert after every task due at or before `due` to keep FIFO ties
        let at = self.pending.partition_point(|d| d.due <= due);
        self.pending.insert(
            at,
            Deferred {
                due,
                generation,
                task,
            },
        );
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|d| d.due)
    }

    /// Remove and return the earliest task if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Deferred<T>> {
        if self.next_due()? <= now {
            Some(self.pending.remove(0))
        } else {
            None
        }
    }

    /// Drop every task not tagged with `generation`.
    ///
    /// Returns the number of tasks removed.
    pub fn retain_generation(&mut self, generation: u64) -> usize {
        let before = self.pending.len();
        self.pending.retain(|d| d.generation == generation);
        before - self.pending.len()
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Is the queue empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over pending tasks in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &Deferred<T>> {
        self.pending.iter()
    }
}
