//! Descritores de buffer
//!
//! Cada descritor tem duas metades com locks diferentes:
//!
//! - `BufMeta` (identidade, refcnt, timestamp) vive dentro do vetor do
//!   bucket e só é tocada com o spinlock do bucket. Migrar de bucket é
//!   mover a struct de um vetor para outro.
//! - `Buf` (flag de validade + payload) fica numa arena fixa, indexada por
//!   `id`. O payload é protegido pelo sleeplock do descritor.

use core::sync::atomic::{AtomicBool, Ordering};

use super::config::BSIZE;
use crate::sync::SleepLock;

/// `dev` de um descritor que nunca recebeu identidade
pub(super) const NO_DEV: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
pub(super) struct BufMeta {
    /// Índice na arena de `Buf`
    pub id: usize,
    pub dev: u32,
    pub blockno: u32,
    /// Donos ativos (handles + pins)
    pub refcnt: u32,
    /// Último acesso, no relógio lógico do cache
    pub timestamp: u64,
}

impl BufMeta {
    pub const fn unassigned(id: usize) -> Self {
        Self {
            id,
            dev: NO_DEV,
            blockno: 0,
            refcnt: 0,
            timestamp: 0,
        }
    }

    #[inline]
    pub fn matches(&self, dev: u32, blockno: u32) -> bool {
        self.dev == dev && self.blockno == blockno
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.dev != NO_DEV
    }

    /// Nova identidade para um descritor reciclado
    pub fn assign(&mut self, dev: u32, blockno: u32, now: u64) {
        self.dev = dev;
        self.blockno = blockno;
        self.refcnt = 1;
        self.timestamp = now;
    }
}

pub(super) struct Buf {
    /// Conteúdo já lido do disco
    pub valid: AtomicBool,
    pub data: SleepLock<[u8; BSIZE]>,
}

impl Buf {
    pub const fn new() -> Self {
        Self {
            valid: AtomicBool::new(false),
            data: SleepLock::new("buffer", [0; BSIZE]),
        }
    }
}

/// Buffer travado devolvido por `bread`/`bget`.
///
/// Existe no máximo um handle travado por descritor. O payload só é
/// acessível enquanto o handle segura o sleeplock; depois de `brelse` o
/// handle guarda apenas a identidade (útil para `bunpin`).
pub struct BufHandle<'a> {
    pub(super) buf: &'a Buf,
    pub(super) id: usize,
    pub(super) dev: u32,
    pub(super) blockno: u32,
    pub(super) held: bool,
}

impl<'a> BufHandle<'a> {
    pub(super) fn new(buf: &'a Buf, id: usize, dev: u32, blockno: u32) -> Self {
        Self {
            buf,
            id,
            dev,
            blockno,
            held: true,
        }
    }

    pub fn dev(&self) -> u32 {
        self.dev
    }

    pub fn blockno(&self) -> u32 {
        self.blockno
    }

    /// Índice do descritor no pool
    pub fn id(&self) -> usize {
        self.id
    }

    /// O contexto atual segura o sleeplock através deste handle?
    pub fn holding(&self) -> bool {
        self.held && self.buf.data.holding()
    }

    pub fn is_valid(&self) -> bool {
        self.buf.valid.load(Ordering::Acquire)
    }

    pub fn data(&self) -> &[u8; BSIZE] {
        self.assert_holding();
        // SAFETY: sleeplock mantido por este handle, que é o único travado
        unsafe { self.buf.data.get() }
    }

    pub fn data_mut(&mut self) -> &mut [u8; BSIZE] {
        self.assert_holding();
        // SAFETY: sleeplock mantido; `&mut self` impede outro acesso ao payload
        unsafe { self.buf.data.get_mut() }
    }

    fn assert_holding(&self) {
        if !self.holding() {
            crate::kerror!("(BIO) acesso ao payload sem sleeplock, bloco=", self.blockno);
            panic!("bdata");
        }
    }
}

impl core::fmt::Debug for BufHandle<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufHandle")
            .field("id", &self.id)
            .field("dev", &self.dev)
            .field("blockno", &self.blockno)
            .field("held", &self.held)
            .finish()
    }
}
