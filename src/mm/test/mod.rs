//! # Testes do Subsistema de Memória
//!
//! - `pmm_test.rs` - Pool de frames e refcounts
//! - `cow_test.rs` - Copy-on-Write e compartilhamento do fork
//! - `fault_test.rs` - Page fault de escrita em página COW
//!
//! As suites rodam no boot com `self_test`; no host cada uma é um `#[test]`.

pub mod pmm_test;

use crate::klib::test_framework::{run_test_suite, SuiteReport};
use crate::mm::config::{KERNBASE, PAGE_SIZE};
use crate::mm::pmm::FramePool;
use crate::mm::PhysAddr;

/// Pool pequeno e independente para um caso de teste
pub fn test_pool(frames: usize) -> FramePool {
    FramePool::new(
        PhysAddr::new(KERNBASE),
        PhysAddr::new(KERNBASE + (frames * PAGE_SIZE) as u64),
    )
}

/// Executa todas as suites de memória
pub fn run_memory_tests() -> SuiteReport {
    let mut total = SuiteReport::default();
    for report in [
        run_test_suite("pmm", pmm_test::PMM_TESTS),
        run_test_suite("cow", cow_test::COW_TESTS),
        run_test_suite("fault", fault_test::FAULT_TESTS),
    ] {
        total.passed += report.passed;
        total.failed += report.failed;
        total.skipped += report.skipped;
    }
    total
}
