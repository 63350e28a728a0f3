use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use load_scheduler::{Load, Scheduler};

#[derive(Debug)]
struct Entry {
    load: Load,
    /// Index of this load's id within [`State::heap`].
    position: usize,
}

/// Addressable binary min-heap over load ids.
///
/// Invariants outside the lock:
/// - `heap` and `entries` hold the same set of ids.
/// - `entries[heap[i]].position == i` for every `i`.
/// - No load is more urgent than its parent.
#[derive(Debug, Default)]
struct State {
    entries: HashMap<Arc<str>, Entry>,
    heap: Vec<Arc<str>>,
}

impl State {
    fn priority_at(&self, i: usize) -> i32 {
        self.entries[&self.heap[i]].load.priority()
    }

    fn more_urgent(&self, a: usize, b: usize) -> bool {
        self.priority_at(a) < self.priority_at(b)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let State { entries, heap } = self;
        for i in [a, b] {
            if let Some(entry) = entries.get_mut(&heap[i]) {
                entry.position = i;
            }
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.more_urgent(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;
            if left < len && self.more_urgent(left, best) {
                best = left;
            }
            if right < len && self.more_urgent(right, best) {
                best = right;
            }
            if best == i {
                break;
            }
            self.swap(i, best);
            i = best;
        }
    }

    /// Restores the heap order around `i` after the priority stored there changed.
    fn repair(&mut self, i: usize) {
        if i > 0 && self.more_urgent(i, (i - 1) / 2) {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
    }

    fn push(&mut self, load: Load) {
        let id: Arc<str> = Arc::from(load.id());
        let position = self.heap.len();
        self.heap.push(Arc::clone(&id));
        self.entries.insert(id, Entry { load, position });
        self.sift_up(position);
    }

    fn remove_at(&mut self, position: usize) -> Option<Load> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(position, last);
        let id = self.heap.pop()?;
        let entry = self.entries.remove(&id)?;
        if position < self.heap.len() {
            self.repair(position);
        }
        Some(entry.load)
    }
}

/// Priority scheduler guarded by one [`Mutex`] that keeps every load's heap position, so
/// `remove` and `update_priority` repair the heap in O(log n) instead of rebuilding it.
#[derive(Debug, Default)]
pub struct IndexedScheduler {
    state: Mutex<State>,
}

impl IndexedScheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                entries: HashMap::with_capacity(capacity),
                heap: Vec::with_capacity(capacity),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for IndexedScheduler {
    fn add(&self, load: Load) -> bool {
        let mut state = self.state();

        if state.entries.contains_key(load.id()) {
            tracing::trace!(id = load.id(), "rejected duplicate load");
            return false;
        }
        state.push(load);
        true
    }

    fn remove(&self, id: &str) -> bool {
        let mut state = self.state();

        let Some(position) = state.entries.get(id).map(|entry| entry.position) else {
            tracing::trace!(id, "cannot remove unknown load");
            return false;
        };
        state.remove_at(position).is_some()
    }

    fn update_priority(&self, id: &str, priority: i32) -> bool {
        let mut state = self.state();

        let Some(entry) = state.entries.get_mut(id) else {
            tracing::trace!(id, "cannot update priority of unknown load");
            return false;
        };
        entry.load.set_priority(priority);
        let position = entry.position;
        state.repair(position);
        true
    }

    fn peek_top(&self) -> Option<Load> {
        let state = self.state();
        let id = state.heap.first()?;
        state.entries.get(id).map(|entry| entry.load.clone())
    }

    fn pop_top(&self) -> Option<Load> {
        self.state().remove_at(0)
    }

    fn get_by_id(&self, id: &str) -> Option<Load> {
        self.state()
            .entries
            .get(id)
            .map(|entry| entry.load.clone())
    }

    fn drain(&self, n: usize) -> Vec<Load> {
        let mut state = self.state();

        let mut items = Vec::with_capacity(n.min(state.heap.len()));
        for _ in 0..n {
            let Some(load) = state.remove_at(0) else {
                break;
            };
            items.push(load);
        }
        items
    }

    fn snapshot(&self) -> Vec<Load> {
        let state = self.state();

        let mut loads: Vec<Load> = state
            .entries
            .values()
            .map(|entry| entry.load.clone())
            .collect();
        loads.sort_by(|a, b| b.cmp_urgency(a));
        loads
    }

    fn len(&self) -> usize {
        self.state().heap.len()
    }
}
