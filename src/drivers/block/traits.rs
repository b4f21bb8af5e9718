//! # Camada de Abstração de Dispositivos de Bloco
//!
//! Primitiva de transferência consumida pelo buffer cache.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              FILESYSTEM (log, inodes)               │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │              BUFFER CACHE (fs::bio)                 │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │              BlockDevice Trait                      │
//! │        read_block()  write_block()                  │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │              DRIVERS (VirtIO, RamDisk)              │
//! └─────────────────────────────────────────────────────┘
//! ```

use core::fmt;

/// Tipos de erro para dispositivos de bloco
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    /// Dispositivo não encontrado ou não inicializado
    NotFound,
    /// Endereço de bloco inválido (fora do intervalo)
    InvalidBlock,
    /// Erro de I/O durante leitura/escrita
    IoError,
    /// Dispositivo somente leitura
    ReadOnly,
    /// Tamanho do buffer incorreto
    InvalidBuffer,
}

impl BlockError {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockError::NotFound => "Dispositivo não encontrado",
            BlockError::InvalidBlock => "Endereço de bloco inválido",
            BlockError::IoError => "Erro de I/O",
            BlockError::ReadOnly => "Dispositivo somente leitura",
            BlockError::InvalidBuffer => "Tamanho do buffer inválido",
        }
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait para dispositivos de bloco
///
/// Transferências são síncronas: quando a chamada volta, o bloco já foi
/// lido para `buf` (ou gravado a partir dele). `dev` identifica o disco
/// lógico; um driver pode atender vários.
pub trait BlockDevice: Send + Sync {
    /// Lê o bloco `blockno` do dispositivo `dev` para `buf`
    fn read_block(&self, dev: u32, blockno: u32, buf: &mut [u8]) -> Result<(), BlockError>;

    /// Escreve `buf` no bloco `blockno` do dispositivo `dev`
    fn write_block(&self, dev: u32, blockno: u32, buf: &[u8]) -> Result<(), BlockError>;

    /// Tamanho do bloco em bytes
    fn block_size(&self) -> usize;

    /// Verifica se o dispositivo é somente leitura
    fn is_read_only(&self) -> bool {
        false
    }
}
