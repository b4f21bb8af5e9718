//! Tipos de Erro do Subsistema de Memória
//!
//! Erros recuperáveis. Violações de invariantes (free de endereço inválido,
//! double free) não passam por aqui: são fatais.

/// Erros do subsistema de memória
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// Sem memória física disponível (OOM)
    OutOfMemory,
    /// Endereço não alinhado a página
    NotAligned,
    /// Endereço fora da faixa gerenciada
    OutOfBounds,
    /// Sem mapeamento válido para o endereço virtual
    NotMapped,
    /// Instalação do novo mapeamento falhou (rollback executado)
    MappingFailed,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "OOM: sem frames físicos disponíveis",
            Self::NotAligned => "Endereço não alinhado a página",
            Self::OutOfBounds => "Endereço fora da faixa gerenciada",
            Self::NotMapped => "Região não mapeada",
            Self::MappingFailed => "Mapeamento falhou",
        }
    }
}

impl core::fmt::Display for MmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;
