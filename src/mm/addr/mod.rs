//! # Addr - Wrappers Type-Safe para Endereços
//!
//! Tipos distintos para PhysAddr e VirtAddr evitando confusão.

mod phys;
mod virt;

pub use phys::PhysAddr;
pub use virt::VirtAddr;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mm::config::{MAXVA, PAGE_SIZE};

    #[test]
    fn rounding_and_alignment() {
        let pa = PhysAddr::new(0x8000_1234);
        assert_eq!(pa.page_round_down(), PhysAddr::new(0x8000_1000));
        assert_eq!(pa.page_round_up(), PhysAddr::new(0x8000_2000));
        assert!(!pa.is_page_aligned());
        assert!(pa.page_round_down().is_page_aligned());
        assert_eq!(pa.page_round_down().add(PAGE_SIZE as u64), PhysAddr::new(0x8000_2000));

        let va = VirtAddr::new(0x3fff);
        assert_eq!(va.page_round_down(), VirtAddr::new(0x3000));
        assert!(VirtAddr::new(0x3000).is_page_aligned());
    }

    #[test]
    fn addressable_limit() {
        assert!(VirtAddr::new(MAXVA - 1).is_addressable());
        assert!(!VirtAddr::new(MAXVA).is_addressable());
    }
}
