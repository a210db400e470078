//! Background tasks module
//!
//! This module contains background tasks that run alongside the display.

pub mod poller;

// Re-export main functions
pub use poller::snapshot_poll_task;
