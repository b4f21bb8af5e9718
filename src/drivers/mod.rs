//! # Kernel Driver Layer
//!
//! Só a camada de bloco entra neste núcleo: a trait `BlockDevice`, que o
//! buffer cache consome, e o ramdisk.

pub mod block;
