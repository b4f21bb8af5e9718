//! # Page Table Entry (Sv39)
//!
//! ```text
//!  63      54 53                    10 9   8 7 6 5 4 3 2 1 0
//! ┌──────────┬─────────────────────────┬─────┬─┬─┬─┬─┬─┬─┬─┬─┐
//! │ reservado│          PPN            │ RSW │D│A│G│U│X│W│R│V│
//! └──────────┴─────────────────────────┴─────┴─┴─┴─┴─┴─┴─┴─┴─┘
//! ```
//!
//! O bit 8 (RSW, livre para software) marca o mapeamento COW.

use bitflags::bitflags;

use crate::mm::PhysAddr;

bitflags! {
    /// Flags de uma PTE
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PteFlags: u64 {
        const VALID = 1 << 0;
        const READ = 1 << 1;
        const WRITE = 1 << 2;
        const EXEC = 1 << 3;
        const USER = 1 << 4;
        const GLOBAL = 1 << 5;
        const ACCESSED = 1 << 6;
        const DIRTY = 1 << 7;
        /// Compartilhado copy-on-write. Nunca junto com WRITE.
        const COW = 1 << 8;
    }
}

const FLAGS_MASK: u64 = 0x3FF;
const PPN_SHIFT: u64 = 10;

#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Pte(u64);

impl Pte {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn new(pa: PhysAddr, flags: PteFlags) -> Self {
        Self(((pa.as_u64() >> 12) << PPN_SHIFT) | flags.bits())
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub fn addr(&self) -> PhysAddr {
        PhysAddr::new((self.0 >> PPN_SHIFT) << 12)
    }

    pub fn flags(&self) -> PteFlags {
        PteFlags::from_bits_truncate(self.0 & FLAGS_MASK)
    }

    pub fn set_flags(&mut self, flags: PteFlags) {
        self.0 = (self.0 & !FLAGS_MASK) | flags.bits();
    }

    pub fn insert(&mut self, flags: PteFlags) {
        self.0 |= flags.bits();
    }

    pub fn remove(&mut self, flags: PteFlags) {
        self.0 &= !flags.bits();
    }

    pub fn is_valid(&self) -> bool {
        self.flags().contains(PteFlags::VALID)
    }
}

impl core::fmt::Debug for Pte {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pte")
            .field("addr", &self.addr())
            .field("flags", &self.flags())
            .finish()
    }
}
