//! Shared test tooling for [`crate::Scheduler`] implementations.
