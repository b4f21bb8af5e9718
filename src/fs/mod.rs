//! Sistema de Arquivos.
//!
//! Submódulos:
//! - `bio`: buffer cache de blocos, entre o FS e o driver de disco.

pub mod bio;

#[cfg(any(test, feature = "self_test"))]
pub mod test;
