//! Rendering module
//!
//! Projects snapshots into display frames, resolves layout from timer
//! enablement, and draws frames onto a terminal surface.

pub mod layout;
pub mod projector;
pub mod surface;

// Re-export main types
pub use layout::{LayoutClass, LayoutMode};
pub use projector::{DisplayFrame, TimeFormat, TimerDisplay};
pub use surface::{DisplaySurface, TerminalSurface};
