//! # Tabela de Reference Counts
//!
//! Um contador por frame, um único spinlock para todas as mutações.
//!
//! Os contadores são atômicos apenas para que `peek` (leitura sem lock)
//! seja bem definida. Toda escrita passa por `RefCounts`, que só existe
//! enquanto o lock está adquirido.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::sync::{Spinlock, SpinlockGuard};

pub struct RefTable {
    lock: Spinlock<()>,
    counts: Box<[AtomicU32]>,
}

impl RefTable {
    pub fn new(frames: usize) -> Self {
        let counts: Vec<AtomicU32> = (0..frames).map(|_| AtomicU32::new(0)).collect();
        Self {
            lock: Spinlock::new(()),
            counts: counts.into_boxed_slice(),
        }
    }

    /// Leitura sem lock. O valor pode estar desatualizado no momento em que
    /// é usado; quem decide com base nele deve revalidar sob `lock()`.
    #[inline]
    pub fn peek(&self, idx: usize) -> u32 {
        self.counts[idx].load(Ordering::Relaxed)
    }

    pub fn lock(&self) -> RefCounts<'_> {
        RefCounts {
            _guard: self.lock.lock(),
            counts: &self.counts,
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

/// Visão mutável da tabela com o lock adquirido.
pub struct RefCounts<'a> {
    _guard: SpinlockGuard<'a, ()>,
    counts: &'a [AtomicU32],
}

impl RefCounts<'_> {
    #[inline]
    pub fn get(&self, idx: usize) -> u32 {
        self.counts[idx].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: u32) {
        self.counts[idx].store(value, Ordering::Relaxed);
    }

    /// Incrementa e devolve o novo valor; `None` se o frame está livre
    /// (refcount zero, na free list).
    #[inline]
    pub fn inc(&mut self, idx: usize) -> Option<u32> {
        let value = match self.get(idx) {
            0 => return None,
            n => n + 1,
        };
        self.set(idx, value);
        Some(value)
    }

    /// Decrementa e devolve o novo valor; `None` se já era zero.
    #[inline]
    pub fn dec(&mut self, idx: usize) -> Option<u32> {
        let value = self.get(idx).checked_sub(1)?;
        self.set(idx, value);
        Some(value)
    }
}
