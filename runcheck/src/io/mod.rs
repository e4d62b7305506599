//! I/O helpers for runcheck commands.

pub mod config;
pub mod loader;
