//! # Memory Statistics
//!
//! Contadores por pool. Incrementados fora de qualquer lock (Relaxed).

use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct PmmStats {
    pub allocs: AtomicU64,
    pub alloc_failures: AtomicU64,
    /// Frames devolvidos à free list (refcount chegou a zero)
    pub reclaims: AtomicU64,
    /// Liberações que só decrementaram o refcount
    pub unshares: AtomicU64,
    pub cow_copies: AtomicU64,
    pub cow_reuses: AtomicU64,
    pub cow_faults: AtomicU64,
}

impl PmmStats {
    pub const fn new() -> Self {
        Self {
            allocs: AtomicU64::new(0),
            alloc_failures: AtomicU64::new(0),
            reclaims: AtomicU64::new(0),
            unshares: AtomicU64::new(0),
            cow_copies: AtomicU64::new(0),
            cow_reuses: AtomicU64::new(0),
            cow_faults: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MemoryStats {
        MemoryStats {
            allocs: self.allocs.load(Ordering::Relaxed),
            alloc_failures: self.alloc_failures.load(Ordering::Relaxed),
            reclaims: self.reclaims.load(Ordering::Relaxed),
            unshares: self.unshares.load(Ordering::Relaxed),
            cow_copies: self.cow_copies.load(Ordering::Relaxed),
            cow_reuses: self.cow_reuses.load(Ordering::Relaxed),
            cow_faults: self.cow_faults.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    pub allocs: u64,
    pub alloc_failures: u64,
    pub reclaims: u64,
    pub unshares: u64,
    pub cow_copies: u64,
    pub cow_reuses: u64,
    pub cow_faults: u64,
}
