//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod catalog_loader;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod http_persistence;
pub mod long_press_timer;
pub mod memory_persistence;
pub mod ports;
pub mod render;
pub mod script_loader;
