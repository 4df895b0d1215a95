//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, modal overlays, toast stack
//! - `input`: Keyboard event handling
//! - `styles`: Theme-aware color schemes and text styling
//! - `toast`: Auto-dismissing notifications

pub mod input;
pub mod render;
pub mod styles;
pub mod toast;
