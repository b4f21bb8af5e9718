//! SleepLock - lock de longa duração com dono

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::hal;

/// Lock de longa duração - o contexto que espera cede a CPU
///
/// # Diferença do Spinlock
///
/// - SleepLock PODE ser mantido através de I/O de disco
/// - Quem espera chama `hal::relax()` (scheduler) em vez de girar
/// - Guarda o dono: liberar sem ser dono é violação fatal
///
/// Não há guard RAII: o buffer cache adquire em `bget` e libera em
/// `brelse`, que são chamadas distintas.
pub struct SleepLock<T> {
    locked: AtomicBool,
    /// Contexto dono (0 = livre)
    owner: AtomicUsize,
    name: &'static str,
    data: UnsafeCell<T>,
}

// SAFETY: acesso aos dados exige ser o dono do lock
unsafe impl<T: Send> Send for SleepLock<T> {}
unsafe impl<T: Send> Sync for SleepLock<T> {}

impl<T> SleepLock<T> {
    pub const fn new(name: &'static str, data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            owner: AtomicUsize::new(0),
            name,
            data: UnsafeCell::new(data),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Adquire o lock, cedendo a CPU enquanto outro contexto o mantém.
    pub fn acquire(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hal::relax();
        }
        self.owner.store(hal::current_context(), Ordering::Relaxed);
    }

    /// Libera o lock. Fatal se o contexto atual não for o dono.
    pub fn release(&self) {
        if !self.holding() {
            crate::kerror!("(Sync) releasesleep sem ser dono, lock:");
            crate::kerror!(self.name);
            panic!("releasesleep");
        }
        self.owner.store(0, Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
    }

    /// O contexto atual é o dono?
    pub fn holding(&self) -> bool {
        self.locked.load(Ordering::Acquire)
            && self.owner.load(Ordering::Relaxed) == hal::current_context()
    }

    /// Acesso aos dados protegidos.
    ///
    /// # Safety
    ///
    /// O contexto atual deve ser o dono (`holding()`), e nenhuma referência
    /// mutável obtida por `get_mut` pode estar viva.
    pub unsafe fn get(&self) -> &T {
        &*self.data.get()
    }

    /// Acesso mutável aos dados protegidos.
    ///
    /// # Safety
    ///
    /// O contexto atual deve ser o dono (`holding()`), e esta deve ser a
    /// única referência viva aos dados.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_mut(&self) -> &mut T {
        &mut *self.data.get()
    }
}
