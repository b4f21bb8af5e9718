//! Erros do buffer cache
//!
//! Buffer sem lock, brelse duplo e falha de disco são fatais e não
//! aparecem aqui.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BioError {
    /// Todos os descritores estão em uso (refcnt > 0)
    NoBuffers,
    /// Pool ou hash de tamanho zero
    InvalidConfig,
    /// O dispositivo não usa blocos de `BSIZE` bytes
    BlockSizeMismatch,
}

impl BioError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoBuffers => "bget: no buffers",
            Self::InvalidConfig => "Configuração do buffer cache inválida",
            Self::BlockSizeMismatch => "Tamanho de bloco do dispositivo != BSIZE",
        }
    }
}

impl core::fmt::Display for BioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type BioResult<T> = Result<T, BioError>;
