//! # Page Frame
//!
//! Armazenamento de um frame físico dentro da arena do pool.

use crate::mm::config::PAGE_SIZE;
use core::cell::UnsafeCell;

/// Um frame de 4 KiB, alinhado a página.
///
/// O conteúdo não tem lock: pertence ao(s) dono(s) do frame, como a RAM
/// pertence a quem a mapeia.
#[repr(C, align(4096))]
pub struct PageFrame {
    bytes: UnsafeCell<[u8; PAGE_SIZE]>,
}

// SAFETY: acesso ao conteúdo é `unsafe` e exige posse do frame
unsafe impl Sync for PageFrame {}
unsafe impl Send for PageFrame {}

impl PageFrame {
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; PAGE_SIZE]),
        }
    }

    /// # Safety
    ///
    /// Nenhuma referência mutável ao conteúdo pode estar viva.
    pub(super) unsafe fn bytes(&self) -> &[u8; PAGE_SIZE] {
        &*self.bytes.get()
    }

    /// # Safety
    ///
    /// O chamador é o único a acessar o frame enquanto a referência vive.
    #[allow(clippy::mut_from_ref)]
    pub(super) unsafe fn bytes_mut(&self) -> &mut [u8; PAGE_SIZE] {
        &mut *self.bytes.get()
    }
}

impl Default for PageFrame {
    fn default() -> Self {
        Self::new()
    }
}
