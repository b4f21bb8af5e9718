//! # Virtual Memory - colaborador de Page Table
//!
//! O núcleo de memória não percorre a árvore de page tables. Ele consome
//! três primitivas do VMM do kernel, expressas pela trait `PageTable`.

mod pte;

pub use pte::{Pte, PteFlags};

use crate::mm::{PhysAddr, VirtAddr};

/// Falha de `map_pages`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// Já existe PTE válida no endereço
    Remap,
    /// Não foi possível alocar uma page table intermediária
    OutOfMemory,
}

impl MapError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remap => "remap: PTE já válida",
            Self::OutOfMemory => "OOM ao alocar page table intermediária",
        }
    }
}

impl core::fmt::Display for MapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primitivas de page table usadas pelo COW.
pub trait PageTable {
    /// PTE de folha para `va`. Com `alloc`, cria níveis intermediários.
    fn walk(&mut self, va: VirtAddr, alloc: bool) -> Option<&mut Pte>;

    /// Endereço físico mapeado em `va` (PTE válida e de usuário).
    fn translate(&mut self, va: VirtAddr) -> Option<PhysAddr>;

    /// Mapeia `[va, va + len)` em `pa` com `perm | VALID`.
    fn map_pages(
        &mut self,
        va: VirtAddr,
        len: usize,
        pa: PhysAddr,
        perm: PteFlags,
    ) -> Result<(), MapError>;
}
