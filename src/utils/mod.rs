//! Utility functions for string and timestamp formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{last_updated_line, relative_age, truncate};
