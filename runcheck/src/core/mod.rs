//! Deterministic, pure logic for checking run artifacts.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! JSON values and return deterministic outputs suitable for tests.

pub mod checker;
pub mod cross_ref;
pub mod grammar;
pub mod naming;
pub mod structure;
pub mod types;
pub mod value;
