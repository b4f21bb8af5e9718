//! # Testes do Sistema de Arquivos
//!
//! - `bio_test.rs` - Buffer cache (hash, LRU global, locks)


use alloc::sync::Arc;

use crate::drivers::block::RamDisk;
use crate::fs::bio::{BioConfig, BufCache, BSIZE};
use crate::klib::test_framework::{run_test_suite, SuiteReport};

/// Dispositivo lógico usado nos testes
pub const TEST_DEV: u32 = 1;

/// Cache independente sobre um ramdisk novo
pub fn test_cache(nbuf: usize, nbucket: usize) -> (BufCache, Arc<RamDisk>) {
    let disk = Arc::new(RamDisk::new(BSIZE, 1024));
    let cache = match BufCache::new(BioConfig::new(nbuf, nbucket), disk.clone()) {
        Ok(cache) => cache,
        Err(e) => panic!("test_cache: {}", e),
    };
    (cache, disk)
}

/// Executa todas as suites de FS
pub fn run_fs_tests() -> SuiteReport {
    run_test_suite("bio", bio_test::BIO_TESTS)
}
