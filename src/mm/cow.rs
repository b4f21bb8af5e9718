//! # Copy-on-Write
//!
//! O fork compartilha frames em vez de copiá-los: cada PTE gravável vira
//! somente leitura + `COW` e o frame ganha uma referência. A primeira
//! escrita de qualquer dono cai em `cow_alloc`, que materializa uma cópia
//! privada (ou reaproveita o frame, se o dono é o último).
//!
//! Invariantes:
//! - `WRITE` e `COW` nunca aparecem juntos numa PTE
//! - `cow_alloc` aloca no máximo um frame e libera no máximo uma referência

use crate::mm::config::PAGE_SIZE;
use crate::mm::pmm::FramePool;
use crate::mm::stats::PmmStats;
use crate::mm::vmm::{PageTable, PteFlags};
use crate::mm::{MmError, MmResult, PhysAddr, VirtAddr};

/// O endereço está mapeado como COW pendente?
///
/// `false` é resultado normal: endereço acima de `MAXVA`, sem PTE, PTE
/// inválida ou mapeamento comum.
pub fn is_cow_page<P: PageTable + ?Sized>(pt: &mut P, va: VirtAddr) -> bool {
    if !va.is_addressable() {
        return false;
    }
    match pt.walk(va, false) {
        Some(pte) if pte.is_valid() => pte.flags().contains(PteFlags::COW),
        _ => false,
    }
}

/// Materializa uma cópia privada e gravável da página em `va`.
///
/// - Único dono (refcount 1): a PTE vira `WRITE` sem `COW`, mesmo frame.
/// - Compartilhado: aloca frame novo, copia a página, instala o novo
///   mapeamento e libera uma referência do frame original.
///
/// Se a instalação falhar, o frame novo é liberado e a PTE original volta
/// a ser válida antes do erro subir.
pub fn cow_alloc<P: PageTable + ?Sized>(
    pool: &FramePool,
    pt: &mut P,
    va: VirtAddr,
) -> MmResult<PhysAddr> {
    if !va.is_page_aligned() {
        return Err(MmError::NotAligned);
    }
    let pa = pt.translate(va).ok_or(MmError::NotMapped)?;

    // Único dono: revalidado sob o lock da tabela de refcounts, que impede
    // um add_ref concorrente enquanto a PTE é promovida.
    let promoted = pool.with_sole_owner(pa, || match pt.walk(va, false) {
        Some(pte) => {
            pte.insert(PteFlags::WRITE);
            pte.remove(PteFlags::COW);
            true
        }
        None => false,
    })?;
    match promoted {
        Some(true) => {
            PmmStats::bump(&pool.raw_stats().cow_reuses);
            crate::ktrace!("(COW) único dono, reuso pa=", pa.as_u64());
            return Ok(pa);
        }
        Some(false) => return Err(MmError::NotMapped),
        None => {}
    }

    let new = pool.alloc_page().ok_or(MmError::OutOfMemory)?;
    pool.copy_frame(new, pa);

    // VALID precisa sair, senão map_pages acusa remap
    let flags = match pt.walk(va, false) {
        Some(pte) => {
            pte.remove(PteFlags::VALID);
            pte.flags()
        }
        None => {
            pool.free_page(new);
            return Err(MmError::NotMapped);
        }
    };

    let perm = flags.union(PteFlags::WRITE).difference(PteFlags::COW);
    if let Err(_e) = pt.map_pages(va, PAGE_SIZE, new, perm) {
        crate::kwarn!("(COW) map_pages falhou, rollback va=", va.as_u64());
        crate::kwarn!(_e.as_str());
        pool.free_page(new);
        // A PTE restaurada continua dona da referência ao frame original
        if let Some(pte) = pt.walk(va, false) {
            pte.insert(PteFlags::VALID);
        }
        return Err(MmError::MappingFailed);
    }

    pool.free_page(pa);
    PmmStats::bump(&pool.raw_stats().cow_copies);
    crate::kdebug!("(COW) cópia privada pa=", new.as_u64());
    Ok(new)
}

/// Compartilha a página `va` do pai com o filho (passo por página do fork).
///
/// Páginas graváveis viram `COW` somente leitura nos dois lados; páginas
/// somente leitura são apenas compartilhadas. O frame ganha uma referência
/// antes do mapeamento do filho existir. Se o mapeamento falhar, a
/// referência é devolvida e a PTE do pai restaurada.
pub fn share_page<P, C>(pool: &FramePool, parent: &mut P, child: &mut C, va: VirtAddr) -> MmResult<()>
where
    P: PageTable + ?Sized,
    C: PageTable + ?Sized,
{
    if !va.is_page_aligned() {
        return Err(MmError::NotAligned);
    }

    let (pa, original, shared) = match parent.walk(va, false) {
        Some(pte) if pte.is_valid() => {
            let original = pte.flags();
            let mut shared = original;
            if shared.contains(PteFlags::WRITE) {
                shared.remove(PteFlags::WRITE);
                shared.insert(PteFlags::COW);
            }
            pte.set_flags(shared);
            (pte.addr(), original, shared)
        }
        _ => return Err(MmError::NotMapped),
    };

    if let Err(e) = pool.add_ref(pa) {
        restore_flags(parent, va, original);
        return Err(e);
    }

    if let Err(_e) = child.map_pages(va, PAGE_SIZE, pa, shared.difference(PteFlags::VALID)) {
        crate::kwarn!("(COW) fork: map_pages do filho falhou va=", va.as_u64());
        crate::kwarn!(_e.as_str());
        pool.free_page(pa);
        restore_flags(parent, va, original);
        return Err(MmError::MappingFailed);
    }

    crate::ktrace!("(COW) compartilhado pa=", pa.as_u64());
    Ok(())
}

fn restore_flags<P: PageTable + ?Sized>(pt: &mut P, va: VirtAddr, flags: PteFlags) {
    if let Some(pte) = pt.walk(va, false) {
        pte.set_flags(flags);
    }
}

/// Prepara a página que contém `va` para uma escrita do kernel em memória
/// de usuário (copyout): materializa se for COW pendente.
///
/// Devolve o endereço físico do início da página.
pub fn prepare_user_write<P: PageTable + ?Sized>(
    pool: &FramePool,
    pt: &mut P,
    va: VirtAddr,
) -> MmResult<PhysAddr> {
    let page = va.page_round_down();
    if is_cow_page(pt, page) {
        cow_alloc(pool, pt, page)
    } else {
        pt.translate(page).ok_or(MmError::NotMapped)
    }
}
