//! Estatísticas do buffer cache

use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct BioStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    /// Reciclagens de um descritor que já tinha identidade
    pub evictions: AtomicU64,
    /// Descritores migrados de outro bucket
    pub steals: AtomicU64,
    /// Buscas reiniciadas porque só havia candidatos em buckets ocupados
    pub retries: AtomicU64,
    pub disk_reads: AtomicU64,
    pub disk_writes: AtomicU64,
}

impl BioStats {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            steals: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            disk_reads: AtomicU64::new(0),
            disk_writes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            steals: self.steals.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            disk_reads: self.disk_reads.load(Ordering::Relaxed),
            disk_writes: self.disk_writes.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub steals: u64,
    pub retries: u64,
    pub disk_reads: u64,
    pub disk_writes: u64,
}

impl CacheStats {
    /// Fração de buscas atendidas sem reciclar descritor (0..=100)
    pub fn hit_ratio(&self) -> u64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0
        } else {
            self.hits * 100 / total
        }
    }
}
