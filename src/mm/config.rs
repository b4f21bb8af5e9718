//! # Configuração do Módulo de Memória
//!
//! Define constantes e funções utilitárias do módulo MM.

// =============================================================================
// CONSTANTES DE TAMANHO
// =============================================================================

/// Tamanho de uma página (4 KiB)
pub const PAGE_SIZE: usize = 4096;

/// Máscara para alinhar endereços a página
pub const PAGE_MASK: usize = !(PAGE_SIZE - 1);

/// Bits de offset dentro de uma página
pub const PAGE_OFFSET_BITS: usize = 12;

// =============================================================================
// LAYOUT DE MEMÓRIA FÍSICA
// =============================================================================

/// Início da RAM (o kernel é carregado aqui)
pub const KERNBASE: u64 = 0x8000_0000;

/// Limite superior da RAM gerenciada pelo alocador de frames (128 MiB)
pub const PHYSTOP: u64 = KERNBASE + 128 * 1024 * 1024;

// =============================================================================
// LAYOUT DE MEMÓRIA VIRTUAL
// =============================================================================

/// Um acima do maior endereço virtual possível (Sv39, sem o bit de sinal)
pub const MAXVA: u64 = 1 << (9 + 9 + 9 + 12 - 1);

// =============================================================================
// PADRÕES DE LIXO
// =============================================================================

/// Preenchimento de página recém-alocada (leituras de lixo ficam visíveis)
pub const ALLOC_JUNK: u8 = 5;

/// Preenchimento de página liberada (pega referências penduradas)
pub const FREE_JUNK: u8 = 1;

// =============================================================================
// FUNÇÕES UTILITÁRIAS
// =============================================================================

/// Alinha valor para cima ao múltiplo de align
#[inline(always)]
pub const fn align_up(val: usize, align: usize) -> usize {
    (val + align - 1) & !(align - 1)
}

/// Alinha valor para baixo ao múltiplo de align
#[inline(always)]
pub const fn align_down(val: usize, align: usize) -> usize {
    val & !(align - 1)
}

/// Verifica se valor está alinhado
#[inline(always)]
pub const fn is_aligned(val: usize, align: usize) -> bool {
    val & (align - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_helpers() {
        assert_eq!(align_up(1, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_up(PAGE_SIZE, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_down(PAGE_SIZE + 7, PAGE_SIZE), PAGE_SIZE);
        assert!(is_aligned(2 * PAGE_SIZE, PAGE_SIZE));
        assert!(!is_aligned(PAGE_SIZE + 1, PAGE_SIZE));
        assert_eq!(PAGE_SIZE & PAGE_MASK, PAGE_SIZE);
        assert_eq!(1usize << PAGE_OFFSET_BITS, PAGE_SIZE);
    }
}
