//! Physical Memory Manager (PMM).
//!
//! Pool de frames físicos de 4 KiB com contagem de referências, base do
//! Copy-on-Write: um frame compartilhado por N mapeamentos tem refcount N e
//! só volta para a free list quando a última referência é liberada.
//!
//! ```text
//!  endereço físico ──frame_index──▶ índice na arena
//!                                     │
//!          ┌──────────────────────────┼─────────────────────────┐
//!          ▼                          ▼                         ▼
//!   frames[idx] (conteúdo)     refs[idx] (RefTable)     free (pilha de índices)
//! ```
//!
//! Locks: `free` e `refs` são spinlocks independentes. A única ordem
//! aninhada é `free → refs` (em `alloc_page`).

mod frame;
mod refcount;

pub use frame::PageFrame;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::mm::config::{ALLOC_JUNK, FREE_JUNK, PAGE_SIZE, PHYSTOP};
use crate::mm::stats::{MemoryStats, PmmStats};
use crate::mm::{MmError, MmResult, PhysAddr};
use crate::sync::Spinlock;
use refcount::RefTable;

pub struct FramePool {
    /// Endereço físico do frame 0
    base: PhysAddr,
    frames: Box<[PageFrame]>,
    /// Índices dos frames com refcount 0
    free: Spinlock<Vec<usize>>,
    refs: RefTable,
    stats: PmmStats,
}

impl FramePool {
    /// Cria o pool para a faixa meio-aberta `[start, end)`.
    ///
    /// `start` é arredondado para cima até a página; só entram páginas
    /// inteiras. Cada frame nasce com refcount 1 e é liberado pelo caminho
    /// normal de `free_page`, que o coloca na free list.
    pub fn new(start: PhysAddr, end: PhysAddr) -> Self {
        let base = start.page_round_up();
        let count = if end > base {
            ((end.as_u64() - base.as_u64()) / PAGE_SIZE as u64) as usize
        } else {
            0
        };

        let frames: Vec<PageFrame> = (0..count).map(|_| PageFrame::new()).collect();
        let pool = Self {
            base,
            frames: frames.into_boxed_slice(),
            free: Spinlock::new(Vec::with_capacity(count)),
            refs: RefTable::new(count),
            stats: PmmStats::new(),
        };

        for idx in 0..count {
            pool.refs.lock().set(idx, 1);
            pool.free_page(pool.frame_addr(idx));
        }

        crate::kinfo!("(PMM) Pool base=", base.as_u64());
        crate::kinfo!("(PMM) Frames livres=", count);
        pool
    }

    /// Pool do boot: do fim da imagem do kernel até `PHYSTOP`.
    pub fn boot(kernel_end: PhysAddr) -> Self {
        Self::new(kernel_end, PhysAddr::new(PHYSTOP))
    }

    // =========================================================================
    // ALOCAÇÃO
    // =========================================================================

    /// Aloca um frame. `None` quando o pool está vazio (o chamador decide).
    ///
    /// O frame volta com refcount 1 e preenchido com `ALLOC_JUNK`.
    pub fn alloc_page(&self) -> Option<PhysAddr> {
        let idx = {
            let mut free = self.free.lock();
            let popped = free.pop();
            match popped {
                Some(idx) => {
                    self.refs.lock().set(idx, 1);
                    idx
                }
                None => {
                    drop(free);
                    PmmStats::bump(&self.stats.alloc_failures);
                    crate::kwarn!("(PMM) OOM: free list vazia");
                    return None;
                }
            }
        };

        // SAFETY: frame acabou de sair da free list; ninguém mais o conhece
        unsafe { self.frames[idx].bytes_mut().fill(ALLOC_JUNK) };

        PmmStats::bump(&self.stats.allocs);
        let pa = self.frame_addr(idx);
        crate::ktrace!("(PMM) alloc pa=", pa.as_u64());
        Some(pa)
    }

    /// Libera uma referência ao frame.
    ///
    /// Só quando o refcount chega a zero o frame é sujado com `FREE_JUNK` e
    /// volta para a free list. Endereço desalinhado, fora da faixa ou com
    /// refcount já zerado é violação de invariante: fatal.
    pub fn free_page(&self, pa: PhysAddr) {
        let idx = match self.frame_index(pa) {
            Ok(idx) => idx,
            Err(_) => {
                crate::kerror!("(PMM) kfree: endereço inválido=", pa.as_u64());
                panic!("kfree");
            }
        };

        let remaining = self.refs.lock().dec(idx);
        let remaining = match remaining {
            Some(n) => n,
            None => {
                crate::kerror!("(PMM) kfree: refcount já era zero em=", pa.as_u64());
                panic!("kfree: double free");
            }
        };

        if remaining != 0 {
            PmmStats::bump(&self.stats.unshares);
            crate::ktrace!("(PMM) unshare pa=", pa.as_u64());
            return;
        }

        // SAFETY: refcount zero, nenhum dono restante
        unsafe { self.frames[idx].bytes_mut().fill(FREE_JUNK) };

        self.free.lock().push(idx);
        PmmStats::bump(&self.stats.reclaims);
        crate::ktrace!("(PMM) free pa=", pa.as_u64());
    }

    // =========================================================================
    // REFERENCE COUNTS
    // =========================================================================

    /// Refcount atual, lido sem lock.
    ///
    /// O valor pode mudar logo depois da leitura. Decisões que dependem
    /// dele (caminho "único dono" do COW) são revalidadas sob o lock.
    pub fn ref_count(&self, pa: PhysAddr) -> MmResult<u32> {
        let idx = self.frame_index(pa)?;
        Ok(self.refs.peek(idx))
    }

    /// Adiciona uma referência (novo compartilhamento COW, ex: fork).
    ///
    /// Endereço fora da faixa é erro. Frame com refcount zero está na free
    /// list e não tem dono para compartilhar: fatal.
    pub fn add_ref(&self, pa: PhysAddr) -> MmResult<()> {
        let idx = self.frame_index(pa)?;
        let count = self.refs.lock().inc(idx);
        let Some(_count) = count else {
            crate::kerror!("(PMM) add_ref em frame livre=", pa.as_u64());
            panic!("add_ref: frame livre");
        };
        crate::ktrace!("(PMM) add_ref count=", _count);
        Ok(())
    }

    /// Executa `f` sob o lock da tabela se o frame tiver exatamente um dono.
    ///
    /// Com o lock adquirido ninguém pode compartilhar o frame (add_ref)
    /// nem liberá-lo enquanto `f` roda.
    pub(crate) fn with_sole_owner<R>(&self, pa: PhysAddr, f: impl FnOnce() -> R) -> MmResult<Option<R>> {
        let idx = self.frame_index(pa)?;
        let refs = self.refs.lock();
        if refs.get(idx) != 1 {
            return Ok(None);
        }
        let result = f();
        drop(refs);
        Ok(Some(result))
    }

    // =========================================================================
    // CONTEÚDO
    // =========================================================================

    /// Conteúdo de um frame.
    ///
    /// # Safety
    ///
    /// `pa` deve ser um frame alocado que o chamador possui, sem referência
    /// mutável viva ao mesmo frame.
    pub unsafe fn frame(&self, pa: PhysAddr) -> &[u8; PAGE_SIZE] {
        self.frames[self.expect_index(pa)].bytes()
    }

    /// Conteúdo mutável de um frame.
    ///
    /// # Safety
    ///
    /// `pa` deve ser um frame alocado que o chamador possui com exclusividade
    /// enquanto a referência vive (sem outros mapeamentos graváveis).
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn frame_mut(&self, pa: PhysAddr) -> &mut [u8; PAGE_SIZE] {
        self.frames[self.expect_index(pa)].bytes_mut()
    }

    /// Copia uma página inteira de `src` para `dst`.
    ///
    /// Roda fora de qualquer lock. `dst` é recém-alocado e privado; `src`
    /// está mapeado só para leitura em todos os seus donos.
    pub(crate) fn copy_frame(&self, dst: PhysAddr, src: PhysAddr) {
        let (d, s) = (self.expect_index(dst), self.expect_index(src));
        // SAFETY: frames distintos; dst é privado, src é somente leitura
        unsafe { self.frames[d].bytes_mut().copy_from_slice(self.frames[s].bytes()) };
    }

    // =========================================================================
    // CONSULTAS
    // =========================================================================

    pub fn base(&self) -> PhysAddr {
        self.base
    }

    /// Fim (exclusivo) da faixa gerenciada
    pub fn end(&self) -> PhysAddr {
        self.frame_addr(self.frames.len())
    }

    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn free_frames(&self) -> usize {
        self.free.lock().len()
    }

    /// Frames com refcount >= 1 (leitura sem lock)
    pub fn owned_frames(&self) -> usize {
        (0..self.refs.len()).filter(|&idx| self.refs.peek(idx) != 0).count()
    }

    pub fn stats(&self) -> MemoryStats {
        self.stats.snapshot()
    }

    pub(crate) fn raw_stats(&self) -> &PmmStats {
        &self.stats
    }

    // =========================================================================
    // CONVERSÃO ENDEREÇO <-> ÍNDICE
    // =========================================================================

    fn frame_addr(&self, idx: usize) -> PhysAddr {
        self.base.add((idx * PAGE_SIZE) as u64)
    }

    fn frame_index(&self, pa: PhysAddr) -> MmResult<usize> {
        if !pa.is_page_aligned() {
            return Err(MmError::NotAligned);
        }
        if pa < self.base {
            return Err(MmError::OutOfBounds);
        }
        let idx = ((pa.as_u64() - self.base.as_u64()) / PAGE_SIZE as u64) as usize;
        if idx >= self.frames.len() {
            return Err(MmError::OutOfBounds);
        }
        Ok(idx)
    }

    fn expect_index(&self, pa: PhysAddr) -> usize {
        match self.frame_index(pa) {
            Ok(idx) => idx,
            Err(e) => {
                crate::kerror!("(PMM) frame fora do pool=", pa.as_u64());
                panic!("pmm: {}", e);
            }
        }
    }
}
