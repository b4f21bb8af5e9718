use crate::mm::config::{align_down, is_aligned, MAXVA, PAGE_SIZE};
use core::fmt;

/// Endereço virtual (wrapper type-safe)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(u64);

impl VirtAddr {
    /// Cria novo endereço virtual
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Retorna o valor interno como u64
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Arredonda para baixo até o início da página
    #[inline]
    pub fn page_round_down(self) -> Self {
        Self(align_down(self.0 as usize, PAGE_SIZE) as u64)
    }

    /// Alinhado a página?
    #[inline]
    pub fn is_page_aligned(self) -> bool {
        is_aligned(self.0 as usize, PAGE_SIZE)
    }

    /// Dentro do espaço endereçável (abaixo de MAXVA)?
    #[inline]
    pub const fn is_addressable(self) -> bool {
        self.0 < MAXVA
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtAddr({:#x})", self.0)
    }
}
