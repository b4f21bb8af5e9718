//! # Synchronization Primitives
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock   → Metadados (free list, refcounts, buckets). Não pode dormir.
//! SleepLock  → Conteúdo de um buffer através de I/O de disco. Pode dormir.
//! ```
//!
//! ## Regras
//!
//! - Nunca manter um Spinlock através de operação lenta
//! - Um SleepLock só é adquirido DEPOIS de soltar o Spinlock correspondente

/// Spinlock (busy-wait, não dorme)
pub mod spinlock;

/// SleepLock (lock de longa duração com dono)
pub mod sleeplock;

pub use sleeplock::SleepLock;
pub use spinlock::{Spinlock, SpinlockGuard};
