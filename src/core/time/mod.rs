//! Tempo

pub mod clock;

pub use clock::LogicalClock;
