//! # Dispositivos de Bloco
//!
//! | Driver      | Status      | Descrição                         |
//! |-------------|-------------|-----------------------------------|
//! | Ramdisk     | Funcional   | Disco em memória (boot e testes)  |
//!
//! Drivers de hardware implementam `BlockDevice` fora deste núcleo.

pub mod ramdisk;
pub mod traits;

pub use ramdisk::RamDisk;
pub use traits::{BlockDevice, BlockError};
