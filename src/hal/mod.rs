//! Hardware Abstraction Layer (HAL)
//!
//! Ponto único de acesso ao contexto de execução. O kernel instala sua
//! implementação no boot; antes disso (e no host) vale o fallback.

pub mod traits;

pub use traits::*;

static HAL: spin::Once<&'static dyn ContextHal> = spin::Once::new();

/// Contexto usado antes do scheduler existir (boot single core).
pub const BOOT_CONTEXT: usize = 1;

/// Instala a HAL de contexto. Chamadas posteriores são ignoradas.
pub fn install(hal: &'static dyn ContextHal) {
    HAL.call_once(|| hal);
}

/// Identidade do contexto de execução atual.
#[inline]
pub fn current_context() -> usize {
    match HAL.get() {
        Some(hal) => hal.current_id(),
        None => fallback::current_id(),
    }
}

/// Cede a CPU enquanto espera por um lock de longa duração.
#[inline]
pub fn relax() {
    match HAL.get() {
        Some(hal) => hal.relax(),
        None => fallback::relax(),
    }
}

#[cfg(not(test))]
mod fallback {
    pub fn current_id() -> usize {
        super::BOOT_CONTEXT
    }

    pub fn relax() {
        core::hint::spin_loop();
    }
}

// No host cada thread do std é um contexto distinto.
#[cfg(test)]
mod fallback {
    use core::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_ID: AtomicUsize = AtomicUsize::new(super::BOOT_CONTEXT + 1);

    std::thread_local! {
        static ID: usize = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current_id() -> usize {
        ID.with(|id| *id)
    }

    pub fn relax() {
        std::thread::yield_now();
    }
}
