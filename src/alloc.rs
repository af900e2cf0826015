//! Allocation tracing for peak-memory measurement.
//!
//! `TrackingAllocator` wraps the system allocator and maintains process-wide
//! live/peak byte counters. Counting is gated on an active [`AllocScope`], so
//! installing the allocator costs two relaxed atomic loads per allocation when
//! no profiling pass is running.
//!
//! The scope is exclusive: the tracer is process-wide mutable state, and only
//! one profiling pass may observe it at a time. A second `AllocScope::enter`
//! while one is live fails with `EngineError::TracerBusy`.
//!
//! Binaries that want memory numbers must install the allocator:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: optibench::alloc::TrackingAllocator = optibench::alloc::TrackingAllocator;
//! ```
//!
//! Without it, snapshots report zero bytes and timing is unaffected.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::EngineError;

static ENABLED: AtomicBool = AtomicBool::new(false);
static SCOPE_ACTIVE: AtomicBool = AtomicBool::new(false);
static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static PEAK_BYTES: AtomicU64 = AtomicU64::new(0);

/// Drop-in replacement for the system allocator that counts live and peak
/// bytes while an [`AllocScope`] is active.
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() && ENABLED.load(Ordering::Relaxed) {
            let live = LIVE_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed)
                + layout.size() as u64;
            PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        if ENABLED.load(Ordering::Relaxed) {
            // Frees of blocks allocated before the scope opened must not
            // underflow the live counter.
            let size = layout.size() as u64;
            let _ = LIVE_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(size))
            });
        }
    }
}

/// Instantaneous view of the tracer's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocSnapshot {
    /// Bytes currently live (allocated within the scope and not yet freed).
    pub current_bytes: u64,
    /// Peak live bytes observed since the scope opened.
    pub peak_bytes: u64,
}

/// Exclusive allocation-tracing scope. Counters are reset on entry and the
/// tracer is released when the scope drops.
pub struct AllocScope {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl AllocScope {
    /// Acquire the tracer, resetting both counters.
    pub fn enter() -> Result<Self, EngineError> {
        if SCOPE_ACTIVE.swap(true, Ordering::Acquire) {
            return Err(EngineError::TracerBusy);
        }
        LIVE_BYTES.store(0, Ordering::Relaxed);
        PEAK_BYTES.store(0, Ordering::Relaxed);
        ENABLED.store(true, Ordering::SeqCst);
        Ok(Self {
            _not_send: std::marker::PhantomData,
        })
    }

    /// Read the counters. Peak accumulates monotonically for the lifetime of
    /// the scope; `current_bytes <= peak_bytes` always holds.
    pub fn snapshot(&self) -> AllocSnapshot {
        let current = LIVE_BYTES.load(Ordering::Relaxed);
        let peak = PEAK_BYTES.load(Ordering::Relaxed).max(current);
        AllocSnapshot {
            current_bytes: current,
            peak_bytes: peak,
        }
    }
}

impl Drop for AllocScope {
    fn drop(&mut self) {
        ENABLED.store(false, Ordering::SeqCst);
        SCOPE_ACTIVE.store(false, Ordering::Release);
    }
}
