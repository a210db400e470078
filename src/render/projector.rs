//! Projection of a snapshot into a renderable display frame

use std::collections::BTreeMap;

use clap::ValueEnum;

use super::layout::{layout_class_for, resolve_layout, LayoutClass, LayoutMode};
use crate::state::snapshot::{Snapshot, TimerState};
use crate::state::tracker::is_low_time;

/// Text shown in place of the numeric readout once a timer expires
pub const TIMES_UP_TEXT: &str = "TIME'S UP";

/// Presentation policy for the remaining-time readout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TimeFormat {
    /// Always HH:MM:SS
    Full,
    /// MM:SS while the hours component is zero
    #[default]
    Compact,
}

/// Format a remaining-seconds value under the given policy.
pub fn format_remaining(total_seconds: u64, format: TimeFormat) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    match format {
        TimeFormat::Compact if hours == 0 => format!("{:02}:{:02}", minutes, seconds),
        _ => format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
    }
}

/// Renderable state of one timer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    /// Whether the slot is shown at all (disabled or absent timers hide it)
    pub visible: bool,
    /// Formatted readout, or the times-up literal
    pub value_text: String,
    /// Alert-active styling, gated on the global warning switch
    pub times_up_style: bool,
    pub low_time_style: bool,
    /// Running / paused visual states
    pub running: bool,
    pub paused: bool,
    pub logo: Option<String>,
    pub layout_class: Option<LayoutClass>,
}

impl TimerDisplay {
    fn hidden() -> Self {
        Self {
            visible: false,
            value_text: String::new(),
            times_up_style: false,
            low_time_style: false,
            running: false,
            paused: false,
            logo: None,
            layout_class: None,
        }
    }
}

/// Complete renderable state for one snapshot.
///
/// Built fresh every poll purely from the snapshot, so identical snapshots
/// always project to identical frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub background_color: String,
    pub font_color: String,
    pub low_time_color: String,
    pub background_image: Option<String>,
    pub layout: LayoutMode,
    pub timers: BTreeMap<String, TimerDisplay>,
}

fn project_timer(
    timer: &TimerState,
    low_time_seconds: u64,
    warning_enabled: bool,
    mode: LayoutMode,
    format: TimeFormat,
) -> TimerDisplay {
    if !timer.enabled {
        return TimerDisplay::hidden();
    }

    let value_text = if timer.times_up {
        TIMES_UP_TEXT.to_string()
    } else {
        format_remaining(timer.time_remaining_seconds, format)
    };

    TimerDisplay {
        visible: true,
        value_text,
        times_up_style: warning_enabled && timer.times_up,
        low_time_style: warning_enabled && is_low_time(timer, low_time_seconds),
        running: timer.is_running,
        paused: !timer.is_running && !timer.times_up,
        logo: timer.logo_filename.clone(),
        layout_class: layout_class_for(mode, timer),
    }
}

/// Project a snapshot onto the configured timer slots.
///
/// Only ids in `timer_ids` get a slot; a configured id missing from the
/// snapshot renders as a hidden slot, and snapshot ids with no slot are
/// ignored.
pub fn project(snapshot: &Snapshot, timer_ids: &[String], format: TimeFormat) -> DisplayFrame {
    let theme = &snapshot.theme;
    let low_time_seconds = theme.low_time_seconds();
    let mode = resolve_layout(&snapshot.timers);

    let timers = timer_ids
        .iter()
        .map(|id| {
            let display = match snapshot.timers.get(id) {
                Some(timer) => project_timer(
                    timer,
                    low_time_seconds,
                    theme.warning_enabled,
                    mode,
                    format,
                ),
                None => TimerDisplay::hidden(),
            };
            (id.clone(), display)
        })
        .collect();

    DisplayFrame {
        background_color: theme.background.clone(),
        font_color: theme.font_color.clone(),
        low_time_color: theme.low_time_color.clone(),
        background_image: snapshot.background_filename.clone(),
        layout: mode,
        timers,
    }
}
