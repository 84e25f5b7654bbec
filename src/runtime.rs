//! Runtime support referenced by generated fakes.
//!
//! Kept deliberately tiny: generated code needs only the invocation
//! counter, and keeping it here means fakes pull in no extra dependency.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-member invocation counter on a generated fake.
///
/// Monotonic and never reset. Supports concurrent increment-and-read from
/// arbitrary caller threads with no lost updates or torn reads, since fakes
/// may be exercised by concurrent test code after the build completes.
#[derive(Debug, Default)]
pub struct InvocationCounter(AtomicU64);

impl InvocationCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increment and return the new count.
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
