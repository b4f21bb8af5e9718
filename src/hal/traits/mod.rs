//! Traits do HAL

pub mod cpu;

pub use cpu::*;
