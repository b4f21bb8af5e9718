// Arquivo: core/time/clock.rs
//
// Propósito: relógio lógico para ordenar eventos de um subsistema.
// Diferente dos jiffies, não depende do timer: cada leitura de `tick()`
// avança o relógio.
//
// Detalhes de Implementação:
// - Um `AtomicU64` por instância (cada buffer cache tem o seu).
// - Valores estritamente crescentes, sem empates.

//! Relógio Lógico

use core::sync::atomic::{AtomicU64, Ordering};

/// Relógio lógico monotônico.
///
/// Cada `tick()` devolve um valor estritamente maior que o anterior, o que
/// dá uma ordem total aos carimbos de último acesso do buffer cache (dois
/// `brelse` no mesmo tick do timer continuam ordenados).
pub struct LogicalClock {
    now: AtomicU64,
}

impl LogicalClock {
    pub const fn new() -> Self {
        Self {
            now: AtomicU64::new(0),
        }
    }

    /// Avança o relógio e devolve o novo instante
    #[inline]
    pub fn tick(&self) -> u64 {
        self.now.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

impl Default for LogicalClock {
    fn default() -> Self {
        Self::new()
    }
}
