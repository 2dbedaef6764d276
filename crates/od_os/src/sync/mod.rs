//! Synchronization primitives.
//!
//! - Re-exports of the standard library locks used across the workspace.
//! - [`Snapshot`]: a copy-on-write cell whose readers never observe a
//!   partially applied update.

// -----------------------------------------------------------------------------
// Modules

mod snapshot;

// -----------------------------------------------------------------------------
// Exports

pub use alloc::sync::{Arc, Weak};
pub use snapshot::Snapshot;
pub use std::sync::{
    LazyLock, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
