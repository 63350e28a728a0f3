use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use load_scheduler::{Load, Scheduler};

/// Heap entry pointing at a load in the index.
///
/// `priority` mirrors the indexed load's priority. Any change to the index is followed by a
/// rebuild, so the two never disagree outside the lock.
#[derive(Debug, PartialEq, Eq)]
struct Slot {
    priority: i32,
    id: Arc<str>,
}

/// [`Ordering::Greater`] corresponds to a higher urgency, so the max-heap yields the lowest
/// priority value first. Ties are broken by id only to keep [`Ord`] total.
impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct State {
    index: HashMap<Arc<str>, Load>,
    heap: BinaryHeap<Slot>,
}

impl State {
    /// Replaces the heap with one built from the index.
    /// [`BinaryHeap`] can neither remove by key nor repair a changed key, so this runs after
    /// every `remove` and `update_priority`.
    fn rebuild(&mut self) {
        self.heap = self
            .index
            .iter()
            .map(|(id, load)| Slot {
                priority: load.priority(),
                id: Arc::clone(id),
            })
            .collect();
        tracing::debug!(loads = self.heap.len(), "rebuilt priority heap");
    }

    fn pop(&mut self) -> Option<Load> {
        let slot = self.heap.pop()?;
        let load = self.index.remove(&slot.id);
        debug_assert!(load.is_some(), "heap handle {} has no indexed load", slot.id);
        load
    }
}

/// Priority scheduler guarded by one [`Mutex`] that rebuilds its heap whenever a key changes.
///
/// # Note
/// `remove` and `update_priority` cost O(n log n) with the lock held. Prefer
/// [`crate::IndexedScheduler`] for large queues with a lot of priority churn.
#[derive(Debug, Default)]
pub struct RebuildScheduler {
    state: Mutex<State>,
}

impl RebuildScheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                index: HashMap::with_capacity(capacity),
                heap: BinaryHeap::with_capacity(capacity),
            }),
        }
    }

    /// Every mutation leaves `State` consistent before anything could panic, so a poisoned
    /// lock still guards valid data.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for RebuildScheduler {
    fn add(&self, load: Load) -> bool {
        let mut state = self.state();

        if state.index.contains_key(load.id()) {
            tracing::trace!(id = load.id(), "rejected duplicate load");
            return false;
        }

        let id: Arc<str> = Arc::from(load.id());
        state.heap.push(Slot {
            priority: load.priority(),
            id: Arc::clone(&id),
        });
        state.index.insert(id, load);
        true
    }

    fn remove(&self, id: &str) -> bool {
        let mut state = self.state();

        if state.index.remove(id).is_none() {
            tracing::trace!(id, "cannot remove unknown load");
            return false;
        }
        state.rebuild();
        true
    }

    fn update_priority(&self, id: &str, priority: i32) -> bool {
        let mut state = self.state();

        let Some(load) = state.index.get_mut(id) else {
            tracing::trace!(id, "cannot update priority of unknown load");
            return false;
        };
        load.set_priority(priority);
        state.rebuild();
        true
    }

    fn peek_top(&self) -> Option<Load> {
        let state = self.state();
        let slot = state.heap.peek()?;
        state.index.get(&slot.id).cloned()
    }

    fn pop_top(&self) -> Option<Load> {
        self.state().pop()
    }

    fn get_by_id(&self, id: &str) -> Option<Load> {
        self.state().index.get(id).cloned()
    }

    fn drain(&self, n: usize) -> Vec<Load> {
        let mut state = self.state();

        let mut items = Vec::with_capacity(n.min(state.index.len()));
        for _ in 0..n {
            let Some(load) = state.pop() else {
                break;
            };
            items.push(load);
        }
        items
    }

    fn snapshot(&self) -> Vec<Load> {
        let state = self.state();

        let mut slots: Vec<&Slot> = state.heap.iter().collect();
        slots.sort_by(|a, b| b.cmp(a));
        slots
            .into_iter()
            .filter_map(|slot| state.index.get(&slot.id).cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.state().index.len()
    }
}
