//! Per-timer edge detection between consecutive snapshots

use super::snapshot::TimerState;

/// Derived low-time predicate for one timer.
///
/// A paused timer is never "low time" even inside the window, and a timer
/// that already expired belongs to the times-up state instead.
pub fn is_low_time(timer: &TimerState, low_time_seconds: u64) -> bool {
    !timer.times_up && timer.is_running && timer.time_remaining_seconds <= low_time_seconds
}

/// Remembered boolean flags from the previously applied snapshot.
///
/// One tracker exists per configured timer id for the lifetime of the
/// session; it is the sole memory used to detect transitions.
#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    times_up_prev: bool,
    low_time_prev: bool,
}

/// Rising and falling transitions detected for one timer on one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeReport {
    pub entered_times_up: bool,
    pub exited_times_up: bool,
    pub entered_low_time: bool,
    pub exited_low_time: bool,
    /// Current flag values, after this snapshot
    pub times_up: bool,
    pub low_time: bool,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the incoming timer state against the remembered flags and
    /// report any transitions.
    ///
    /// The stored flags always follow the latest snapshot, even while the
    /// timer is disabled, so re-enabling a timer whose flags never changed
    /// cannot replay an old transition.
    pub fn observe(&mut self, timer: &TimerState, low_time_seconds: u64) -> EdgeReport {
        let low_time = is_low_time(timer, low_time_seconds);

        let report = EdgeReport {
            entered_times_up: timer.times_up && !self.times_up_prev,
            exited_times_up: !timer.times_up && self.times_up_prev,
            entered_low_time: low_time && !self.low_time_prev,
            exited_low_time: !low_time && self.low_time_prev,
            times_up: timer.times_up,
            low_time,
        };

        self.times_up_prev = timer.times_up;
        self.low_time_prev = low_time;
        report
    }
}
