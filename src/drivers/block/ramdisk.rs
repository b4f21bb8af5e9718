//! Ramdisk - dispositivo de bloco em memória
//!
//! Blocos nunca escritos são lidos como zero. Conta as transferências,
//! o que permite verificar quantas vezes o buffer cache foi ao disco.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::traits::{BlockDevice, BlockError};
use crate::sync::Spinlock;

pub struct RamDisk {
    block_size: usize,
    /// Número de blocos por dispositivo lógico
    total_blocks: u32,
    blocks: Spinlock<BTreeMap<(u32, u32), Box<[u8]>>>,
    reads: AtomicU64,
    writes: AtomicU64,
    /// Injeta `IoError` em todas as transferências
    failing: AtomicBool,
}

impl RamDisk {
    pub fn new(block_size: usize, total_blocks: u32) -> Self {
        Self {
            block_size,
            total_blocks,
            blocks: Spinlock::new(BTreeMap::new()),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Preenche um bloco direto no "disco", sem passar pelo cache
    pub fn fill(&self, dev: u32, blockno: u32, byte: u8) {
        let data = alloc::vec![byte; self.block_size].into_boxed_slice();
        self.blocks.lock().insert((dev, blockno), data);
    }

    /// Primeiro byte do bloco como está no "disco"
    pub fn peek(&self, dev: u32, blockno: u32) -> Option<u8> {
        self.blocks.lock().get(&(dev, blockno)).map(|b| b[0])
    }

    fn check(&self, blockno: u32, len: usize) -> Result<(), BlockError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(BlockError::IoError);
        }
        if blockno >= self.total_blocks {
            return Err(BlockError::InvalidBlock);
        }
        if len != self.block_size {
            return Err(BlockError::InvalidBuffer);
        }
        Ok(())
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, dev: u32, blockno: u32, buf: &mut [u8]) -> Result<(), BlockError> {
        self.check(blockno, buf.len())?;
        match self.blocks.lock().get(&(dev, blockno)) {
            Some(data) => buf.copy_from_slice(data),
            None => buf.fill(0),
        }
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write_block(&self, dev: u32, blockno: u32, buf: &[u8]) -> Result<(), BlockError> {
        self.check(blockno, buf.len())?;
        self.blocks
            .lock()
            .insert((dev, blockno), Box::from(buf));
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.block_size
    }
}
