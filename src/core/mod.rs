//! Core module - Form model and supporting utilities
//!
//! This module provides:
//! - Form identifiers and the load report model
//! - Typed errors
//! - Form file reading strategies
//! - Path construction utilities
//! - Hashing and time helpers

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod util;
