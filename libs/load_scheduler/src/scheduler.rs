use crate::Load;

/// A thread-safe priority queue of uniquely identified [`Load`]s whose priorities may change
/// while they are queued.
///
/// Every method is linearizable: implementations perform the whole operation inside one
/// critical section, so no caller ever observes a half-applied change. The most urgent load is
/// the one with the lowest priority value; loads with equal priority leave in unspecified order.
///
/// Loads are returned as owned copies. The scheduler stays the only owner of the queued
/// records, so the ordering can only change through [`Scheduler::update_priority`].
pub trait Scheduler: Send + Sync + 'static {
    /// Adds `load` to the queue.
    /// Returns `false` and leaves the queue untouched if a load with the same id is queued already.
    fn add(&self, load: Load) -> bool;

    /// Removes the load with `id`. Returns `false` if there is no such load.
    fn remove(&self, id: &str) -> bool;

    /// Sets the priority of the load with `id` to `priority` and reorders the queue.
    /// Returns `false` if there is no such load.
    fn update_priority(&self, id: &str, priority: i32) -> bool;

    /// Returns the most urgent load without removing it.
    fn peek_top(&self) -> Option<Load>;

    /// Removes and returns the most urgent load.
    fn pop_top(&self) -> Option<Load>;

    fn get_by_id(&self, id: &str) -> Option<Load>;

    /// Removes up to `n` of the most urgent loads, most urgent first, in one critical section.
    fn drain(&self, n: usize) -> Vec<Load>;

    /// All queued loads in urgency order, most urgent first. The queue is left untouched.
    fn snapshot(&self) -> Vec<Load>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
