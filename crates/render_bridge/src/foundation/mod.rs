//! Foundation module - Core utilities shared by the bridge
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Logging utilities

pub mod logging;
