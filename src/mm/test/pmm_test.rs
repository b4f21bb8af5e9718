//! Testes do PMM (pool de frames + refcounts)

use crate::kcheck;
use crate::klib::test_framework::{TestCase, TestResult};
use crate::mm::config::{ALLOC_JUNK, FREE_JUNK, KERNBASE, PAGE_SIZE};
use crate::mm::pmm::FramePool;
use crate::mm::test::test_pool;
use crate::mm::{MmError, PhysAddr};

/// Testes do PMM
pub const PMM_TESTS: &[TestCase] = &[
    TestCase::new("pmm_init_seeds_free_list", test_init_seeds_free_list),
    TestCase::new("pmm_init_rounds_range", test_init_rounds_range),
    TestCase::new("pmm_alloc_alignment", test_alloc_alignment),
    TestCase::new("pmm_exhaustion", test_exhaustion),
    TestCase::new("pmm_shared_release", test_shared_release),
    TestCase::new("pmm_add_ref_bounds", test_add_ref_bounds),
    TestCase::new("pmm_conservation", test_conservation),
];

fn test_init_seeds_free_list() -> TestResult {
    let pool = test_pool(8);
    kcheck!(pool.total_frames() == 8, "(PMM) total != 8");
    kcheck!(pool.free_frames() == 8, "(PMM) free list incompleta");
    kcheck!(pool.owned_frames() == 0, "(PMM) frame com dono após init");
    kcheck!(pool.stats().reclaims == 8, "(PMM) seed não passou por free_page");
    TestResult::Passed
}

fn test_init_rounds_range() -> TestResult {
    // Início desalinhado e fim no meio de uma página: só páginas inteiras
    let pool = FramePool::new(
        PhysAddr::new(KERNBASE + 1),
        PhysAddr::new(KERNBASE + 4 * PAGE_SIZE as u64 + 100),
    );
    kcheck!(pool.base() == PhysAddr::new(KERNBASE + PAGE_SIZE as u64), "(PMM) base não arredondada");
    kcheck!(pool.total_frames() == 3, "(PMM) contagem de frames errada");

    let empty = FramePool::new(PhysAddr::new(KERNBASE), PhysAddr::new(KERNBASE));
    kcheck!(empty.total_frames() == 0, "(PMM) faixa vazia com frames");
    kcheck!(empty.alloc_page().is_none(), "(PMM) alloc em pool vazio");
    TestResult::Passed
}

fn test_alloc_alignment() -> TestResult {
    let pool = test_pool(4);
    for _ in 0..4 {
        let pa = match pool.alloc_page() {
            Some(pa) => pa,
            None => return TestResult::Failed,
        };
        kcheck!(pa.is_page_aligned(), "(PMM) frame desalinhado");
        kcheck!(pa >= pool.base() && pa < pool.end(), "(PMM) frame fora da faixa");
        kcheck!(pool.ref_count(pa) == Ok(1), "(PMM) refcount != 1 após alloc");
        // SAFETY: frame recém-alocado, único dono
        let bytes = unsafe { pool.frame(pa) };
        kcheck!(bytes.iter().all(|&b| b == ALLOC_JUNK), "(PMM) frame sem junk de alloc");
    }
    TestResult::Passed
}

fn test_exhaustion() -> TestResult {
    let pool = test_pool(2);
    let a = pool.alloc_page();
    let b = pool.alloc_page();
    kcheck!(a.is_some() && b.is_some() && a != b, "(PMM) allocs inválidos");
    kcheck!(pool.alloc_page().is_none(), "(PMM) alloc além da capacidade");
    kcheck!(pool.stats().alloc_failures == 1, "(PMM) falha não contada");

    if let Some(a) = a {
        pool.free_page(a);
    }
    kcheck!(pool.alloc_page() == a, "(PMM) frame liberado não reutilizado");
    TestResult::Passed
}

fn test_shared_release() -> TestResult {
    let pool = test_pool(4);
    let pa = match pool.alloc_page() {
        Some(pa) => pa,
        None => return TestResult::Failed,
    };
    kcheck!(pool.add_ref(pa).is_ok(), "(PMM) add_ref falhou");
    kcheck!(pool.ref_count(pa) == Ok(2), "(PMM) refcount != 2");

    let free_before = pool.free_frames();
    pool.free_page(pa);
    kcheck!(pool.ref_count(pa) == Ok(1), "(PMM) refcount != 1 após unshare");
    kcheck!(pool.free_frames() == free_before, "(PMM) frame compartilhado foi para a free list");

    pool.free_page(pa);
    kcheck!(pool.ref_count(pa) == Ok(0), "(PMM) refcount != 0");
    kcheck!(pool.free_frames() == free_before + 1, "(PMM) frame não voltou para a free list");
    // SAFETY: frame livre, ninguém mais o acessa neste teste
    let bytes = unsafe { pool.frame(pa) };
    kcheck!(bytes.iter().all(|&b| b == FREE_JUNK), "(PMM) frame liberado sem junk");
    TestResult::Passed
}

fn test_add_ref_bounds() -> TestResult {
    let pool = test_pool(2);
    kcheck!(
        pool.add_ref(PhysAddr::new(KERNBASE + 1)) == Err(MmError::NotAligned),
        "(PMM) add_ref desalinhado aceito"
    );
    kcheck!(
        pool.add_ref(pool.end()) == Err(MmError::OutOfBounds),
        "(PMM) add_ref acima da faixa aceito"
    );
    kcheck!(
        pool.add_ref(PhysAddr::new(KERNBASE - PAGE_SIZE as u64)) == Err(MmError::OutOfBounds),
        "(PMM) add_ref abaixo da faixa aceito"
    );
    kcheck!(
        pool.ref_count(pool.end()) == Err(MmError::OutOfBounds),
        "(PMM) ref_count fora da faixa aceito"
    );
    TestResult::Passed
}

fn test_conservation() -> TestResult {
    let pool = test_pool(6);
    let mut held = alloc::vec::Vec::new();
    for round in 0..20usize {
        if round % 3 == 2 {
            if let Some(pa) = held.pop() {
                pool.free_page(pa);
            }
        } else if let Some(pa) = pool.alloc_page() {
            held.push(pa);
        }
        kcheck!(
            pool.free_frames() + pool.owned_frames() == pool.total_frames(),
            "(PMM) conservação violada"
        );
        kcheck!(pool.owned_frames() == held.len(), "(PMM) frames com dono != mantidos");
    }
    TestResult::Passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::klib::test_framework::run_test_suite;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::vec::Vec;

    #[test]
    fn pmm_suite() {
        assert!(run_test_suite("pmm", PMM_TESTS).all_passed());
    }

    #[test]
    #[should_panic(expected = "kfree")]
    fn free_misaligned_is_fatal() {
        let pool = test_pool(2);
        pool.free_page(PhysAddr::new(KERNBASE + 8));
    }

    #[test]
    #[should_panic(expected = "kfree")]
    fn free_out_of_range_is_fatal() {
        let pool = test_pool(2);
        pool.free_page(pool.end());
    }

    #[test]
    #[should_panic(expected = "kfree: double free")]
    fn free_at_zero_is_fatal() {
        let pool = test_pool(2);
        let pa = pool.alloc_page().unwrap();
        pool.free_page(pa);
        pool.free_page(pa);
    }

    #[test]
    #[should_panic(expected = "add_ref: frame livre")]
    fn add_ref_on_free_frame_is_fatal() {
        let pool = test_pool(2);
        let pa = pool.alloc_page().unwrap();
        pool.free_page(pa);
        pool.add_ref(pa).ok();
    }

    #[test]
    fn concurrent_alloc_free_keeps_pool_whole() {
        let pool = Arc::new(test_pool(32));
        let workers: Vec<_> = (0..4u8)
            .map(|id| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let mut mine = Vec::new();
                        for _ in 0..4 {
                            if let Some(pa) = pool.alloc_page() {
                                // SAFETY: frame recém-alocado por esta thread
                                unsafe { pool.frame_mut(pa).fill(id) };
                                mine.push(pa);
                            }
                        }
                        for &pa in &mine {
                            // SAFETY: ainda somos os únicos donos
                            let bytes = unsafe { pool.frame(pa) };
                            assert!(bytes.iter().all(|&b| b == id), "frame entregue a dois donos");
                        }
                        for pa in mine {
                            pool.free_page(pa);
                        }
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(pool.free_frames(), pool.total_frames());
        assert_eq!(pool.owned_frames(), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Alloc,
        Share(usize),
        Release(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Alloc),
            any::<usize>().prop_map(Op::Share),
            any::<usize>().prop_map(Op::Release),
        ]
    }

    proptest! {
        #[test]
        fn frames_are_conserved(ops in proptest::collection::vec(op(), 0..64)) {
            let pool = test_pool(8);
            // Uma entrada por referência mantida
            let mut refs: Vec<PhysAddr> = Vec::new();
            for op in ops {
                match op {
                    Op::Alloc => {
                        match pool.alloc_page() {
                            Some(pa) => refs.push(pa),
                            None => {
                                prop_assert_eq!(pool.free_frames(), 0);
                            }
                        }
                    }
                    Op::Share(i) if !refs.is_empty() => {
                        let pa = refs[i % refs.len()];
                        prop_assert!(pool.add_ref(pa).is_ok());
                        refs.push(pa);
                    }
                    Op::Release(i) if !refs.is_empty() => {
                        let pa = refs.swap_remove(i % refs.len());
                        let before = pool.free_frames();
                        let last = !refs.contains(&pa);
                        pool.free_page(pa);
                        let expected = if last { before + 1 } else { before };
                        prop_assert_eq!(pool.free_frames(), expected);
                    }
                    _ => {}
                }
                prop_assert_eq!(pool.free_frames() + pool.owned_frames(), pool.total_frames());
                for &pa in &refs {
                    let held = refs.iter().filter(|&&r| r == pa).count() as u32;
                    prop_assert_eq!(pool.ref_count(pa), Ok(held));
                }
            }
        }
    }
}
