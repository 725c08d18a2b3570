//! Cache module - Loads and serves form templates
//!
//! Provides:
//! - The immutable loaded form set and its load report
//! - The load-once holder and the process-wide instance

pub mod global;
pub mod store;
