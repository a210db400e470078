//! State management module
//!
//! The snapshot wire model, per-timer edge tracking, and the viewer session
//! state that ties them together.

pub mod snapshot;
pub mod tracker;
pub mod viewer_state;

// Re-export main types
pub use snapshot::{Snapshot, Theme, TimerState};
pub use tracker::{EdgeReport, EdgeTracker};
pub use viewer_state::{SnapshotOutcome, ViewerState};
