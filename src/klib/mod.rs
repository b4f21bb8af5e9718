//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno do Kernel.

pub mod test_framework;

pub use test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};
