//! Wall-clock timing and peak heap sampling.
//!
//! The harness only talks to the [`Timer`] and [`MemoryProbe`] traits, so
//! tests can swap in fixed measurements.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Measures how long a closure takes.
pub trait Timer {
    fn time<R>(&mut self, f: impl FnOnce() -> R) -> (R, Duration);
}

/// [`Timer`] backed by [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Timer for WallClock {
    fn time<R>(&mut self, f: impl FnOnce() -> R) -> (R, Duration) {
        let start = Instant::now();
        let result = f();
        (result, start.elapsed())
    }
}

/// Measures the peak number of heap bytes a closure holds at once.
pub trait MemoryProbe {
    fn peak_during<R>(&mut self, f: impl FnOnce() -> R) -> (R, usize);
}

/// Probe for runs without allocation tracking; always reports zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProbe;

impl MemoryProbe for NoopProbe {
    fn peak_during<R>(&mut self, f: impl FnOnce() -> R) -> (R, usize) {
        (f(), 0)
    }
}

/// Global allocator wrapper that keeps live and peak byte counts.
///
/// Install it in a binary with
///
/// ```rust,ignore
/// #[global_allocator]
/// static ALLOCATOR: TrackingAllocator = TrackingAllocator::new();
/// ```
///
/// Counting only happens when the wrapper is the global allocator; a
/// stand-alone instance stays at zero.
#[derive(Debug)]
pub struct TrackingAllocator {
    live: AtomicUsize,
    peak: AtomicUsize,
}

impl TrackingAllocator {
    pub const fn new() -> Self {
        TrackingAllocator {
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Bytes currently allocated through this allocator.
    pub fn live_bytes(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Highest value `live_bytes` reached since the last reset.
    pub fn peak_bytes(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Restarts peak tracking from the current live count.
    pub fn reset_peak(&self) {
        self.peak.store(self.live_bytes(), Ordering::Relaxed);
    }

    fn record_alloc(&self, size: usize) {
        let live = self.live.fetch_add(size, Ordering::Relaxed) + size;
        self.peak.fetch_max(live, Ordering::Relaxed);
    }

    fn record_dealloc(&self, size: usize) {
        self.live.fetch_sub(size, Ordering::Relaxed);
    }
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: every request is forwarded unchanged to `System`; the wrapper only
// updates counters.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        self.record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            self.record_dealloc(layout.size());
            self.record_alloc(new_size);
        }
        new_ptr
    }
}

/// [`MemoryProbe`] reading a [`TrackingAllocator`].
///
/// Reports the peak bytes allocated above the live count at the moment
/// the closure starts, so memory held by the caller is not charged to it.
#[derive(Debug, Clone, Copy)]
pub struct AllocationProbe {
    allocator: &'static TrackingAllocator,
}

impl AllocationProbe {
    pub fn new(allocator: &'static TrackingAllocator) -> Self {
        AllocationProbe { allocator }
    }
}

impl MemoryProbe for AllocationProbe {
    fn peak_during<R>(&mut self, f: impl FnOnce() -> R) -> (R, usize) {
        let baseline = self.allocator.live_bytes();
        self.allocator.reset_peak();
        let result = f();
        let peak = self.allocator.peak_bytes().saturating_sub(baseline);
        (result, peak)
    }
}
