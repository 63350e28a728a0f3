use std::sync::{Mutex, MutexGuard, PoisonError};

use load_scheduler::{Load, Scheduler};

/// Naive implementation of a scheduler that just organizes all loads linearly within a vector.
/// No optimizations are attempted with this implementation.
#[derive(Debug, Default)]
pub struct NaiveScheduler {
    /// Loads sorted by urgency, the most urgent one at the end of the vector, so it can easily
    /// be `popped`.
    pool: Mutex<Vec<Load>>,
}

impl NaiveScheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    fn pool(&self) -> MutexGuard<'_, Vec<Load>> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn position(pool: &[Load], id: &str) -> Option<usize> {
    pool.iter().position(|load| load.id() == id)
}

impl Scheduler for NaiveScheduler {
    /// Very naive and expensive addition to the queue (~O(n log n) due to the duplicate scan and
    /// the sort on every insert).
    fn add(&self, load: Load) -> bool {
        let mut guard = self.pool();
        if position(&guard, load.id()).is_some() {
            return false;
        }
        guard.push(load);
        guard.sort_by(Load::cmp_urgency);
        true
    }

    /// Removing keeps the remaining loads sorted, no re-sort needed.
    fn remove(&self, id: &str) -> bool {
        let mut guard = self.pool();
        match position(&guard, id) {
            Some(i) => {
                guard.remove(i);
                true
            }
            None => false,
        }
    }

    fn update_priority(&self, id: &str, priority: i32) -> bool {
        let mut guard = self.pool();
        let Some(i) = position(&guard, id) else {
            return false;
        };
        guard[i].set_priority(priority);
        guard.sort_by(Load::cmp_urgency);
        true
    }

    fn peek_top(&self) -> Option<Load> {
        self.pool().last().cloned()
    }

    fn pop_top(&self) -> Option<Load> {
        self.pool().pop()
    }

    fn get_by_id(&self, id: &str) -> Option<Load> {
        self.pool().iter().find(|load| load.id() == id).cloned()
    }

    fn drain(&self, n: usize) -> Vec<Load> {
        let mut guard = self.pool();

        let drain_start = guard.len().saturating_sub(n);

        let mut drained = guard.split_off(drain_start);
        drained.reverse(); // bring highest urgency to the front
        drained
    }

    fn snapshot(&self) -> Vec<Load> {
        self.pool().iter().rev().cloned().collect()
    }

    fn len(&self) -> usize {
        self.pool().len()
    }
}
