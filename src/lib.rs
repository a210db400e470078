//! Timer Viewer - A polling display client for networked countdown timers
//!
//! This library consumes the timer server's status endpoint, derives
//! edge-triggered alerts from consecutive snapshots, and renders the
//! countdown display.

pub mod alert;
pub mod config;
pub mod render;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use alert::AudioOutput;
pub use config::Config;
pub use state::ViewerState;
pub use tasks::snapshot_poll_task;
pub use utils::signals::shutdown_signal;
