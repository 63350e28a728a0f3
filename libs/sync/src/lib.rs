//! Lock-based [`load_scheduler::Scheduler`] implementations.
//!
//! Both keep a single owning index of the queued loads next to an ordering structure that only
//! holds id handles into it. They differ in how a priority change or a removal restores the heap
//! order:
//! - [`RebuildScheduler`] rebuilds the whole heap from the index, O(n log n).
//! - [`IndexedScheduler`] tracks each load's heap position and sifts it, O(log n).

mod indexed;
mod lock_based;

// region:    --- Exports
pub use indexed::IndexedScheduler;
pub use lock_based::RebuildScheduler;
// endregion: --- Exports
