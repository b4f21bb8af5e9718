//! # Buffer Cache
//!
//! Cache de blocos de disco com pool fixo de descritores distribuído em
//! buckets de hash (`blockno % nbucket`), cada um com seu spinlock.
//!
//! ```text
//!   bget(dev, blockno)
//!        │
//!        ▼
//!   bucket[hash] ──hit──▶ refcnt++ ──▶ acquire sleeplock
//!        │
//!       miss
//!        ▼
//!   LRU global: bucket alvo + try_lock nos demais
//!        │
//!        ▼
//!   vítima (refcnt 0, timestamp mais antigo) migra para o bucket alvo
//! ```
//!
//! ## Locks
//!
//! - Spinlock do bucket: lista de descritores e seus metadados. Nunca é
//!   mantido durante I/O.
//! - Sleeplock do descritor: payload. Só é adquirido depois que o spinlock
//!   do bucket foi liberado.
//!
//! A busca de vítima segura o bucket alvo e usa `try_lock` nos outros; um
//! bucket ocupado é pulado, nunca esperado. Se só havia candidatos em
//! buckets pulados, a busca solta o bucket alvo, cede a CPU e recomeça.
//!
//! Recência é só o timestamp: `brelse` não reposiciona o descritor.

pub mod buf;
pub mod config;
pub mod error;
pub mod stats;

pub use buf::BufHandle;
pub use config::{BioConfig, BSIZE, NBUCKET, NBUF};
pub use error::{BioError, BioResult};
pub use stats::{BioStats, CacheStats};

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::Ordering;

use crate::core::time::LogicalClock;
use crate::drivers::block::BlockDevice;
use crate::sync::{Spinlock, SpinlockGuard};
use buf::{Buf, BufMeta};

type Bucket = Spinlock<Vec<BufMeta>>;

/// Resultado da busca por vítima
enum Victim {
    /// Posição no bucket alvo
    Home(usize),
    /// Já removida de outro bucket (cujo lock foi solto logo após)
    Stolen(BufMeta),
    /// Há candidatos possíveis atrás de buckets ocupados
    Contended,
    /// Nenhum descritor com refcnt 0 em lugar nenhum
    Exhausted,
}

pub struct BufCache {
    bufs: Box<[Buf]>,
    buckets: Box<[Bucket]>,
    device: Arc<dyn BlockDevice>,
    clock: LogicalClock,
    stats: BioStats,
}

impl BufCache {
    /// Cria o cache. Todo o pool começa no bucket 0; a distribuição entre
    /// buckets acontece por migração durante as reciclagens.
    pub fn new(config: BioConfig, device: Arc<dyn BlockDevice>) -> BioResult<Self> {
        config.validate()?;
        if device.block_size() != BSIZE {
            crate::kerror!("(BIO) bloco do dispositivo=", device.block_size());
            return Err(BioError::BlockSizeMismatch);
        }

        let bufs: Vec<Buf> = (0..config.nbuf).map(|_| Buf::new()).collect();
        // Capacidade cheia em todo bucket: migração não realoca com spinlock
        let buckets: Vec<Bucket> = (0..config.nbucket)
            .map(|i| {
                let mut list = Vec::with_capacity(config.nbuf);
                if i == 0 {
                    list.extend((0..config.nbuf).map(BufMeta::unassigned));
                }
                Spinlock::new(list)
            })
            .collect();

        crate::kinfo!("(BIO) Buffers=", config.nbuf);
        crate::kinfo!("(BIO) Buckets=", config.nbucket);

        Ok(Self {
            bufs: bufs.into_boxed_slice(),
            buckets: buckets.into_boxed_slice(),
            device,
            clock: LogicalClock::new(),
            stats: BioStats::new(),
        })
    }

    #[inline]
    fn hash(&self, blockno: u32) -> usize {
        blockno as usize % self.buckets.len()
    }

    // =========================================================================
    // BGET
    // =========================================================================

    /// Busca ou recicla o descritor de `(dev, blockno)` e o devolve travado.
    ///
    /// `NoBuffers` quando todos os descritores estão em uso.
    pub fn try_bget(&self, dev: u32, blockno: u32) -> BioResult<BufHandle<'_>> {
        let target = self.hash(blockno);

        loop {
            let mut home = self.buckets[target].lock();

            if let Some(pos) = home.iter().position(|m| m.matches(dev, blockno)) {
                let meta = &mut home[pos];
                meta.refcnt += 1;
                meta.timestamp = self.clock.tick();
                let id = meta.id;
                drop(home);
                BioStats::bump(&self.stats.hits);
                crate::ktrace!("(BIO) hit blockno=", blockno);
                return Ok(self.lock_buf(id, dev, blockno));
            }

            let now = self.clock.tick();
            let (id, recycled) = match self.find_victim(target, &home) {
                Victim::Home(pos) => {
                    let meta = &mut home[pos];
                    let recycled = meta.is_assigned();
                    meta.assign(dev, blockno, now);
                    (meta.id, recycled)
                }
                Victim::Stolen(mut meta) => {
                    let recycled = meta.is_assigned();
                    meta.assign(dev, blockno, now);
                    let id = meta.id;
                    home.insert(0, meta);
                    BioStats::bump(&self.stats.steals);
                    crate::kdebug!("(BIO) descritor migrado para bucket=", target);
                    (id, recycled)
                }
                Victim::Contended => {
                    drop(home);
                    BioStats::bump(&self.stats.retries);
                    crate::ktrace!("(BIO) buckets ocupados, nova busca blockno=", blockno);
                    crate::hal::relax();
                    continue;
                }
                Victim::Exhausted => {
                    drop(home);
                    crate::kwarn!("(BIO) sem buffers livres, blockno=", blockno);
                    return Err(BioError::NoBuffers);
                }
            };

            // refcnt era 0: ninguém segura o sleeplock deste descritor
            self.bufs[id].valid.store(false, Ordering::Release);
            drop(home);

            BioStats::bump(&self.stats.misses);
            if recycled {
                BioStats::bump(&self.stats.evictions);
                crate::kdebug!("(BIO) evict, novo blockno=", blockno);
            }
            return Ok(self.lock_buf(id, dev, blockno));
        }
    }

    /// Como `try_bget`, mas pool esgotado é fatal.
    pub fn bget(&self, dev: u32, blockno: u32) -> BufHandle<'_> {
        match self.try_bget(dev, blockno) {
            Ok(b) => b,
            Err(e) => {
                crate::kerror!("(BIO) bget falhou, blockno=", blockno);
                panic!("{}", e);
            }
        }
    }

    /// LRU entre todos os buckets alcançáveis.
    ///
    /// O bucket alvo já está travado pelo chamador. Os outros são visitados
    /// em round-robin a partir de `target + 1` com `try_lock`; o lock do
    /// bucket que contém o melhor candidato fica retido até o fim da busca
    /// e é solto assim que a vítima é removida.
    fn find_victim(&self, target: usize, home: &[BufMeta]) -> Victim {
        let mut best = lru_in(home);
        let mut held: Option<(SpinlockGuard<'_, Vec<BufMeta>>, usize)> = None;
        let mut skipped = false;

        let n = self.buckets.len();
        for step in 1..n {
            let i = (target + step) % n;
            let Some(guard) = self.buckets[i].try_lock() else {
                skipped = true;
                continue;
            };
            if let Some((pos, ts)) = lru_in(&guard) {
                if best.map_or(true, |(_, oldest)| ts < oldest) {
                    best = Some((pos, ts));
                    // Solta o bucket do candidato anterior
                    held = Some((guard, pos));
                }
            }
        }

        match (held, best) {
            (Some((mut guard, pos)), _) => Victim::Stolen(guard.remove(pos)),
            (None, Some((pos, _))) => Victim::Home(pos),
            (None, None) if skipped => Victim::Contended,
            (None, None) => Victim::Exhausted,
        }
    }

    fn lock_buf(&self, id: usize, dev: u32, blockno: u32) -> BufHandle<'_> {
        let buf = &self.bufs[id];
        buf.data.acquire();
        BufHandle::new(buf, id, dev, blockno)
    }

    // =========================================================================
    // API DO FS
    // =========================================================================

    /// Bloco travado com o conteúdo do disco.
    pub fn bread(&self, dev: u32, blockno: u32) -> BufHandle<'_> {
        let mut b = self.bget(dev, blockno);
        if !b.is_valid() {
            if let Err(_e) = self.device.read_block(dev, blockno, b.data_mut()) {
                crate::kerror!("(BIO) erro de leitura, blockno=", blockno);
                crate::kerror!(_e.as_str());
                panic!("bread");
            }
            b.buf.valid.store(true, Ordering::Release);
            BioStats::bump(&self.stats.disk_reads);
        }
        b
    }

    /// Grava o payload no disco. Exige o sleeplock.
    pub fn bwrite(&self, b: &BufHandle<'_>) {
        if !b.holding() {
            crate::kerror!("(BIO) bwrite sem sleeplock, blockno=", b.blockno);
            panic!("bwrite");
        }
        if let Err(_e) = self.device.write_block(b.dev, b.blockno, b.data()) {
            crate::kerror!("(BIO) erro de escrita, blockno=", b.blockno);
            crate::kerror!(_e.as_str());
            panic!("bwrite: disk");
        }
        BioStats::bump(&self.stats.disk_writes);
    }

    /// Libera o buffer: solta o sleeplock e, sob o lock do bucket,
    /// decrementa o refcnt e carimba o último acesso.
    pub fn brelse(&self, b: &mut BufHandle<'_>) {
        if !b.holding() {
            crate::kerror!("(BIO) brelse sem sleeplock, blockno=", b.blockno);
            panic!("brelse");
        }
        b.buf.data.release();
        b.held = false;

        let now = self.clock.tick();
        self.with_meta(b, |meta| {
            meta.refcnt -= 1;
            meta.timestamp = now;
        });
    }

    /// Mantém o bloco residente sem segurar o payload.
    pub fn bpin(&self, b: &BufHandle<'_>) {
        self.with_meta(b, |meta| meta.refcnt += 1);
    }

    pub fn bunpin(&self, b: &BufHandle<'_>) {
        self.with_meta(b, |meta| {
            if meta.refcnt == 0 {
                crate::kerror!("(BIO) bunpin com refcnt zero, blockno=", meta.blockno);
                panic!("bunpin");
            }
            meta.refcnt -= 1;
        });
    }

    /// Metadados de um descritor referenciado.
    ///
    /// Com refcnt > 0 a identidade não muda, e o descritor está no bucket
    /// do seu `blockno`. Um handle cujo descritor já foi reciclado para
    /// outro bloco não o encontra: fatal.
    fn with_meta<R>(&self, b: &BufHandle<'_>, f: impl FnOnce(&mut BufMeta) -> R) -> R {
        let mut bucket = self.buckets[self.hash(b.blockno)].lock();
        match bucket
            .iter_mut()
            .find(|m| m.id == b.id && m.matches(b.dev, b.blockno))
        {
            Some(meta) => f(meta),
            None => {
                drop(bucket);
                crate::kerror!("(BIO) descritor fora do bucket, blockno=", b.blockno);
                panic!("bio: descritor perdido");
            }
        }
    }

    // =========================================================================
    // CONSULTAS
    // =========================================================================

    pub fn nbuf(&self) -> usize {
        self.bufs.len()
    }

    pub fn nbucket(&self) -> usize {
        self.buckets.len()
    }

    /// Refcnt do bloco em cache, `None` se não estiver em cache
    pub fn refcnt(&self, dev: u32, blockno: u32) -> Option<u32> {
        let bucket = self.buckets[self.hash(blockno)].lock();
        bucket.iter().find(|m| m.matches(dev, blockno)).map(|m| m.refcnt)
    }

    /// Bucket onde o bloco está, `None` se não estiver em cache
    pub fn bucket_of(&self, dev: u32, blockno: u32) -> Option<usize> {
        (0..self.buckets.len())
            .find(|&i| self.buckets[i].lock().iter().any(|m| m.matches(dev, blockno)))
    }

    pub fn bucket_len(&self, i: usize) -> usize {
        self.buckets[i].lock().len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}

/// Descritor livre (refcnt 0) mais antigo de um bucket: (posição, timestamp)
fn lru_in(list: &[BufMeta]) -> Option<(usize, u64)> {
    list.iter()
        .enumerate()
        .filter(|(_, m)| m.refcnt == 0)
        .min_by_key(|(_, m)| m.timestamp)
        .map(|(pos, m)| (pos, m.timestamp))
}
