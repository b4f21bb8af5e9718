//! # Page Fault Handler
//!
//! Só resolve escrita em página COW. Alocação preguiçosa e swap não
//! existem neste núcleo; o resto vira `FaultResult` para o chamador
//! (normalmente: matar o processo).

use crate::mm::cow::{cow_alloc, is_cow_page};
use crate::mm::pmm::FramePool;
use crate::mm::stats::PmmStats;
use crate::mm::vmm::PageTable;
use crate::mm::{MmError, VirtAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    Read,
    Write,
    Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultResult {
    Success,
    OutOfMemory,
    ProtectionViolation,
    InvalidAddress,
}

#[derive(Debug, Clone, Copy)]
pub struct PageFaultInfo {
    pub addr: VirtAddr,
    pub ip: VirtAddr,
    pub access: AccessType,
}

/// scause: instruction page fault
pub const SCAUSE_INST_PAGE_FAULT: u64 = 12;
/// scause: load page fault
pub const SCAUSE_LOAD_PAGE_FAULT: u64 = 13;
/// scause: store/AMO page fault
pub const SCAUSE_STORE_PAGE_FAULT: u64 = 15;

impl PageFaultInfo {
    pub fn new(addr: VirtAddr, ip: VirtAddr, access: AccessType) -> Self {
        Self { addr, ip, access }
    }

    /// Decodifica scause/stval/sepc. `None` se não for page fault.
    pub fn from_scause(scause: u64, stval: u64, sepc: u64) -> Option<Self> {
        let access = match scause {
            SCAUSE_INST_PAGE_FAULT => AccessType::Execute,
            SCAUSE_LOAD_PAGE_FAULT => AccessType::Read,
            SCAUSE_STORE_PAGE_FAULT => AccessType::Write,
            _ => return None,
        };
        Some(Self::new(VirtAddr::new(stval), VirtAddr::new(sepc), access))
    }
}

pub fn handle_page_fault<P: PageTable + ?Sized>(
    pool: &FramePool,
    pt: &mut P,
    info: PageFaultInfo,
) -> FaultResult {
    if !info.addr.is_addressable() {
        crate::kerror!("(Fault) Endereço acima de MAXVA:", info.addr.as_u64());
        return FaultResult::InvalidAddress;
    }

    let page = info.addr.page_round_down();

    if info.access == AccessType::Write && is_cow_page(pt, page) {
        PmmStats::bump(&pool.raw_stats().cow_faults);
        return match cow_alloc(pool, pt, page) {
            Ok(_) => FaultResult::Success,
            Err(MmError::OutOfMemory) => {
                crate::kwarn!("(Fault) OOM resolvendo COW em:", info.addr.as_u64());
                FaultResult::OutOfMemory
            }
            Err(_) => {
                crate::kerror!("(Fault) COW não resolvido em:", info.addr.as_u64());
                FaultResult::InvalidAddress
            }
        };
    }

    if pt.translate(page).is_some() {
        crate::kerror!("(Fault) Protection Violation at:", info.addr.as_u64());
        crate::kerror!("(Fault) PC da falha:", info.ip.as_u64());
        FaultResult::ProtectionViolation
    } else {
        crate::kerror!("(Fault) Sem mapeamento em:", info.addr.as_u64());
        FaultResult::InvalidAddress
    }
}
