//! Platform and synchronization primitives for the `objdoc` crates.
//!
//! The registries are the only long-lived shared state in the workspace,
//! and everything they need lives in [`sync`].
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod sync;
