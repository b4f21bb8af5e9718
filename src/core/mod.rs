//! Core Module
//!
//! Infraestrutura comum aos subsistemas: logging e tempo.

pub mod logging;
pub mod time;
