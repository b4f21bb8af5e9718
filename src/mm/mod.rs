//! # Memory Management Subsystem (MM)
//!
//! Núcleo de memória física do Redstone OS: pool de frames com contagem de
//! referências e o Copy-on-Write construído sobre ele.
//!
//! ## 🏗️ Arquitetura dos Módulos
//!
//! | Módulo  | Responsabilidade |
//! |---------|------------------|
//! | `pmm`   | Pool de frames de 4 KiB, free list e tabela de refcounts. |
//! | `cow`   | Classificação COW, cópia privada e compartilhamento do fork. |
//! | `fault` | Page fault de escrita em página COW. |
//! | `vmm`   | PTE Sv39 e a trait `PageTable` consumida pelo COW. |
//! | `addr`  | `PhysAddr` / `VirtAddr`. |
//!
//! ## Locks
//!
//! O PMM tem dois spinlocks curtos (free list e refcounts). A única ordem
//! aninhada é `free → refs`. Nenhum dos dois é mantido durante a cópia de
//! página do COW, e nenhum é adquirido com um sleeplock do buffer cache.
//!
//! ```text
//! fork ──share_page──▶ add_ref + PTE RO|COW
//!                            │
//! escrita ──page fault──▶ cow_alloc ──▶ alloc_page / free_page
//! ```

pub mod addr;
pub mod config;
pub mod cow;
pub mod error;
pub mod fault;
pub mod pmm;
pub mod stats;
pub mod vmm;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

pub use addr::{PhysAddr, VirtAddr};
pub use error::{MmError, MmResult};
