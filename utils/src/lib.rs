//! Shared utilities for the Birthright service.

pub mod format;
pub mod logging;

pub use format::{abbreviate_hash, format_number};
pub use logging::{init_logging, LogFormat};
