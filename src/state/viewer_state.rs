//! Viewer-side state: edge trackers and snapshot application

use std::{collections::BTreeMap, sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::snapshot::Snapshot;
use super::tracker::EdgeTracker;
use crate::alert::dispatcher::{collect_alerts, AlertEvent};
use crate::render::projector::{project, DisplayFrame, TimeFormat};

/// Everything one snapshot application produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOutcome {
    /// Alert triggers raised by this snapshot, at most one per kind per timer
    pub alerts: Vec<AlertEvent>,
    /// Renderable frame for this snapshot
    pub frame: DisplayFrame,
}

/// Owned state of the viewer session.
///
/// One edge tracker per configured timer id, created at startup and kept for
/// the whole session. Applying a snapshot is atomic: edge detection, alert
/// collection, and projection all happen inside one call before the next
/// poll's completion can touch the trackers.
#[derive(Debug)]
pub struct ViewerState {
    timer_ids: Vec<String>,
    time_format: TimeFormat,
    trackers: Mutex<BTreeMap<String, EdgeTracker>>,
    /// Client-side sequence number of the last applied snapshot (0 = none)
    last_applied_seq: Mutex<u64>,
    last_applied_at: Mutex<Option<DateTime<Utc>>>,
    pub start_time: Instant,
}

impl ViewerState {
    /// Create the session state for a fixed set of timer ids.
    pub fn new(timer_ids: &[String], time_format: TimeFormat) -> Self {
        let trackers = timer_ids
            .iter()
            .map(|id| (id.clone(), EdgeTracker::new()))
            .collect();

        Self {
            timer_ids: timer_ids.to_vec(),
            time_format,
            trackers: Mutex::new(trackers),
            last_applied_seq: Mutex::new(0),
            last_applied_at: Mutex::new(None),
            start_time: Instant::now(),
        }
    }

    /// Apply one polled snapshot.
    ///
    /// Returns `Ok(None)` when the snapshot is stale, i.e. a response tagged
    /// with a sequence number at or below the last applied one; stale
    /// responses must never rewind edge state. Snapshot timer ids without a
    /// configured slot are ignored; configured ids missing from the snapshot
    /// leave their tracker untouched.
    pub fn apply_snapshot(
        &self,
        seq: u64,
        snapshot: &Snapshot,
    ) -> Result<Option<SnapshotOutcome>, String> {
        {
            let mut last = self
                .last_applied_seq
                .lock()
                .map_err(|e| format!("Failed to lock sequence state: {}", e))?;
            if seq <= *last {
                debug!("Dropping stale snapshot (seq {} <= {})", seq, *last);
                return Ok(None);
            }
            *last = seq;
        }

        let mut trackers = self
            .trackers
            .lock()
            .map_err(|e| format!("Failed to lock edge trackers: {}", e))?;

        let low_time_seconds = snapshot.theme.low_time_seconds();
        let mut alerts = Vec::new();

        for (id, tracker) in trackers.iter_mut() {
            let Some(timer) = snapshot.timers.get(id) else {
                trace!("Timer {} missing from snapshot, leaving tracker as-is", id);
                continue;
            };

            // Flags track through disabled periods; alerts only fire for
            // transitions observed while the timer is shown.
            let edges = tracker.observe(timer, low_time_seconds);
            if timer.enabled {
                alerts.extend(collect_alerts(id, &edges, snapshot));
            }
        }
        drop(trackers);

        {
            let mut at = self
                .last_applied_at
                .lock()
                .map_err(|e| format!("Failed to lock applied-at timestamp: {}", e))?;
            *at = Some(Utc::now());
        }

        let frame = project(snapshot, &self.timer_ids, self.time_format);
        Ok(Some(SnapshotOutcome { alerts, frame }))
    }

    /// Timestamp of the last applied snapshot, if any.
    pub fn last_applied_at(&self) -> Option<DateTime<Utc>> {
        self.last_applied_at.lock().ok().and_then(|at| *at)
    }

    /// Session uptime as a formatted string.
    pub fn uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::dispatcher::AlertKind;
    use crate::state::snapshot::{Theme, TimerState};

    fn ids() -> Vec<String> {
        vec!["1".to_string(), "2".to_string()]
    }

    fn state() -> ViewerState {
        ViewerState::new(&ids(), TimeFormat::Compact)
    }

    fn snapshot_with(id: &str, timer: TimerState) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.timers.insert(id.to_string(), timer);
        snapshot
    }

    fn running(remaining: u64) -> TimerState {
        TimerState {
            enabled: true,
            is_running: true,
            times_up: false,
            time_remaining_seconds: remaining,
            logo_filename: None,
        }
    }

    #[test]
    fn crossing_the_low_time_threshold_alerts_exactly_once() {
        let state = state();

        let above = snapshot_with("1", running(301));
        let outcome = state.apply_snapshot(1, &above).unwrap().unwrap();
        assert!(outcome.alerts.is_empty());

        let at = snapshot_with("1", running(300));
        let outcome = state.apply_snapshot(2, &at).unwrap().unwrap();
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].kind, AlertKind::LowTime);
        assert_eq!(outcome.alerts[0].timer_id, "1");

        // Further snapshots inside the window stay silent.
        let inside = snapshot_with("1", running(299));
        let outcome = state.apply_snapshot(3, &inside).unwrap().unwrap();
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn expiry_alerts_once_and_never_repeats() {
        let state = state();
        state
            .apply_snapshot(1, &snapshot_with("1", running(1)))
            .unwrap();

        let expired = snapshot_with(
            "1",
            TimerState {
                enabled: true,
                is_running: false,
                times_up: true,
                time_remaining_seconds: 0,
                logo_filename: None,
            },
        );
        let outcome = state.apply_snapshot(2, &expired).unwrap().unwrap();
        let kinds: Vec<_> = outcome.alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::TimesUp]);

        for seq in 3..8 {
            let outcome = state.apply_snapshot(seq, &expired).unwrap().unwrap();
            assert!(outcome.alerts.is_empty());
        }
    }

    #[test]
    fn reapplying_an_identical_snapshot_changes_nothing() {
        let state = state();
        let snapshot = snapshot_with("1", running(250));

        let first = state.apply_snapshot(1, &snapshot).unwrap().unwrap();
        let second = state.apply_snapshot(2, &snapshot).unwrap().unwrap();

        assert!(second.alerts.is_empty());
        assert_eq!(first.frame, second.frame);
    }

    #[test]
    fn applying_a_snapshot_records_the_applied_timestamp() {
        let state = state();
        assert!(state.last_applied_at().is_none());

        state
            .apply_snapshot(1, &snapshot_with("1", running(100)))
            .unwrap();
        assert!(state.last_applied_at().is_some());

        // Stale snapshots do not touch the timestamp path.
        let before = state.last_applied_at();
        assert!(state
            .apply_snapshot(1, &snapshot_with("1", running(99)))
            .unwrap()
            .is_none());
        assert_eq!(state.last_applied_at(), before);
    }

    #[test]
    fn stale_sequence_numbers_are_dropped() {
        let state = state();
        let snapshot = snapshot_with("1", running(400));

        assert!(state.apply_snapshot(2, &snapshot).unwrap().is_some());

        // A slow response from an earlier request arrives late.
        let late = snapshot_with("1", running(500));
        assert!(state.apply_snapshot(1, &late).unwrap().is_none());
        assert!(state.apply_snapshot(2, &late).unwrap().is_none());

        assert!(state.apply_snapshot(3, &snapshot).unwrap().is_some());
    }

    #[test]
    fn warning_disabled_mutes_alerts_but_renders_numbers() {
        let state = state();
        let mut above = snapshot_with("1", running(301));
        above.theme = Theme {
            warning_enabled: false,
            ..Theme::default()
        };
        let mut at = snapshot_with("1", running(300));
        at.theme = above.theme.clone();

        state.apply_snapshot(1, &above).unwrap();
        let outcome = state.apply_snapshot(2, &at).unwrap().unwrap();
        assert!(outcome.alerts.is_empty());
        assert_eq!(outcome.frame.timers["1"].value_text, "05:00");
    }

    #[test]
    fn independent_timers_alert_independently() {
        let state = state();

        let mut first = Snapshot::default();
        first.timers.insert("1".to_string(), running(301));
        first.timers.insert("2".to_string(), running(200));
        let outcome = state.apply_snapshot(1, &first).unwrap().unwrap();
        // Timer 2 starts inside the window, so its run begins here.
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].timer_id, "2");

        let mut second = first.clone();
        second.timers.get_mut("1").unwrap().time_remaining_seconds = 300;
        let outcome = state.apply_snapshot(2, &second).unwrap().unwrap();
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].timer_id, "1");
    }

    #[test]
    fn unknown_snapshot_ids_are_ignored() {
        let state = state();
        let snapshot = snapshot_with("7", running(100));

        let outcome = state.apply_snapshot(1, &snapshot).unwrap().unwrap();
        assert!(outcome.alerts.is_empty());
        assert!(!outcome.frame.timers.contains_key("7"));
        assert!(!outcome.frame.timers["1"].visible);
    }

    #[test]
    fn disabling_with_flags_held_does_not_retrigger_on_reenable() {
        let state = state();
        let expired = TimerState {
            enabled: true,
            is_running: false,
            times_up: true,
            time_remaining_seconds: 0,
            logo_filename: None,
        };

        let outcome = state
            .apply_snapshot(1, &snapshot_with("1", expired.clone()))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.alerts.len(), 1);

        let disabled = TimerState {
            enabled: false,
            ..expired.clone()
        };
        let outcome = state
            .apply_snapshot(2, &snapshot_with("1", disabled))
            .unwrap()
            .unwrap();
        assert!(outcome.alerts.is_empty());
        assert!(!outcome.frame.timers["1"].visible);

        // Re-enabled with times_up still true: not a new transition.
        let outcome = state
            .apply_snapshot(3, &snapshot_with("1", expired))
            .unwrap()
            .unwrap();
        assert!(outcome.alerts.is_empty());
        assert!(outcome.frame.timers["1"].visible);
    }
}
