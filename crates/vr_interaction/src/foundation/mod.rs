//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Arena keys for scene nodes and controllers
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
