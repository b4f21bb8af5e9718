//! Configuração do buffer cache

use super::error::{BioError, BioResult};

/// Tamanho do bloco de disco (bytes)
pub const BSIZE: usize = 1024;

/// Blocos que uma operação do FS pode tocar
pub const MAXOPBLOCKS: usize = 10;

/// Descritores no pool do buffer cache
pub const NBUF: usize = MAXOPBLOCKS * 3;

/// Buckets do hash (blockno % NBUCKET)
pub const NBUCKET: usize = 2;

/// Dimensões de uma instância do buffer cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BioConfig {
    pub nbuf: usize,
    pub nbucket: usize,
}

impl BioConfig {
    pub const fn new(nbuf: usize, nbucket: usize) -> Self {
        Self { nbuf, nbucket }
    }

    pub fn validate(&self) -> BioResult<()> {
        if self.nbuf == 0 || self.nbucket == 0 {
            return Err(BioError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for BioConfig {
    fn default() -> Self {
        Self::new(NBUF, NBUCKET)
    }
}
