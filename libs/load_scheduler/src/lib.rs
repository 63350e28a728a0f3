mod load;
mod scheduler;
pub mod test;

// region:    --- Exports
pub use load::{Load, LoadError};
pub use scheduler::Scheduler;
// endregion: --- Exports
