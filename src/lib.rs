//! KMem - núcleo de memória física e buffer cache do Redstone OS.
//!
//! Ponto central de exportação dos módulos.
//!
//! - `mm`: pool de frames com refcount e Copy-on-Write
//! - `fs::bio`: buffer cache de blocos com hash e LRU global
//!
//! Os pools são estruturas próprias (`FramePool`, `BufCache`) criadas no
//! boot e passadas a quem precisa; não há estado global além do sink de
//! log e da HAL.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Infraestrutura ---
pub mod core; // Logging, relógio lógico
pub mod hal; // Contexto de execução (dono de sleeplocks)
pub mod klib; // Framework de testes do kernel
pub mod sync; // Spinlock e SleepLock

// --- Subsistemas ---
pub mod drivers; // BlockDevice e ramdisk
pub mod fs; // Buffer cache
pub mod mm; // PMM + COW

/// Executa todas as suites internas (boot com `self_test`).
#[cfg(any(test, feature = "self_test"))]
pub fn run_self_tests() -> klib::test_framework::SuiteReport {
    let mm = mm::test::run_memory_tests();
    let fs = fs::test::run_fs_tests();

    let report = klib::test_framework::SuiteReport {
        passed: mm.passed + fs.passed,
        failed: mm.failed + fs.failed,
        skipped: mm.skipped + fs.skipped,
    };
    if report.all_passed() {
        crate::kok!("(SelfTest) Todas as suites passaram");
    } else {
        crate::kerror!("(SelfTest) Suites com falha:", report.failed);
    }
    report
}
