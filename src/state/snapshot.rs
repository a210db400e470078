//! Wire model for the server's timer status snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Theme settings shared by the whole display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    /// Background color as a hex string
    #[serde(default = "default_background")]
    pub background: String,
    /// Font color as a hex string
    #[serde(default = "default_font_color")]
    pub font_color: String,
    /// Color applied to the readout while inside the low-time window
    #[serde(default = "default_low_time_color")]
    pub low_time_color: String,
    /// Size of the low-time window in minutes
    #[serde(default = "default_low_time_minutes")]
    pub low_time_minutes: u64,
    /// Global mute for audio and visual alert triggering
    #[serde(default = "default_warning_enabled")]
    pub warning_enabled: bool,
}

fn default_background() -> String {
    "#000000".to_string()
}

fn default_font_color() -> String {
    "#FFFFFF".to_string()
}

fn default_low_time_color() -> String {
    "#FF4444".to_string()
}

fn default_low_time_minutes() -> u64 {
    5
}

fn default_warning_enabled() -> bool {
    true
}

impl Theme {
    /// Low-time threshold converted to seconds.
    /// The minutes value is server-supplied and unvalidated, so the
    /// conversion saturates instead of overflowing.
    pub fn low_time_seconds(&self) -> u64 {
        self.low_time_minutes.saturating_mul(60)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: default_background(),
            font_color: default_font_color(),
            low_time_color: default_low_time_color(),
            low_time_minutes: default_low_time_minutes(),
            warning_enabled: default_warning_enabled(),
        }
    }
}

/// Authoritative per-timer state as reported by the server.
///
/// The viewer only ever reads this; all elapsed-time accounting happens
/// server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimerState {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub times_up: bool,
    #[serde(default)]
    pub time_remaining_seconds: u64,
    #[serde(default)]
    pub logo_filename: Option<String>,
}

/// One poll response describing the full server-side timer and theme state.
///
/// Every field defaults so a sparse or partially malformed body still parses;
/// the display keeps functioning on whatever the server sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub background_filename: Option<String>,
    #[serde(default)]
    pub times_up_sound: Option<String>,
    #[serde(default)]
    pub low_time_sound: Option<String>,
    #[serde(default)]
    pub timers: BTreeMap<String, TimerState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_status_body() {
        let body = r##"{
            "theme": {
                "background": "#112233",
                "font_color": "#EEEEEE",
                "low_time_color": "#FF0000",
                "low_time_minutes": 3,
                "warning_enabled": false
            },
            "background_filename": "stage.jpg",
            "times_up_sound": "horn.mp3",
            "low_time_sound": null,
            "timers": {
                "1": {
                    "enabled": true,
                    "is_running": true,
                    "times_up": false,
                    "time_remaining_seconds": 185,
                    "logo_filename": "team_a.png"
                },
                "2": {
                    "enabled": false,
                    "is_running": false,
                    "times_up": false,
                    "time_remaining_seconds": 0,
                    "logo_filename": null
                }
            }
        }"##;

        let snapshot: Snapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snapshot.theme.low_time_minutes, 3);
        assert!(!snapshot.theme.warning_enabled);
        assert_eq!(snapshot.background_filename.as_deref(), Some("stage.jpg"));
        assert_eq!(snapshot.times_up_sound.as_deref(), Some("horn.mp3"));
        assert_eq!(snapshot.low_time_sound, None);

        let timer_1 = &snapshot.timers["1"];
        assert!(timer_1.enabled && timer_1.is_running);
        assert_eq!(timer_1.time_remaining_seconds, 185);
        assert_eq!(timer_1.logo_filename.as_deref(), Some("team_a.png"));
    }

    #[test]
    fn sparse_body_falls_back_to_defaults() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"timers": {"1": {}}}"#).unwrap();
        assert_eq!(snapshot.theme.background, "#000000");
        assert_eq!(snapshot.theme.font_color, "#FFFFFF");
        assert_eq!(snapshot.theme.low_time_minutes, 5);
        assert!(snapshot.theme.warning_enabled);
        assert_eq!(snapshot.background_filename, None);

        let timer_1 = &snapshot.timers["1"];
        assert!(!timer_1.enabled);
        assert_eq!(timer_1.time_remaining_seconds, 0);
    }

    #[test]
    fn low_time_threshold_converts_to_seconds() {
        let theme = Theme {
            low_time_minutes: 5,
            ..Theme::default()
        };
        assert_eq!(theme.low_time_seconds(), 300);
    }

    #[test]
    fn absurd_low_time_minutes_saturates_instead_of_overflowing() {
        let theme = Theme {
            low_time_minutes: u64::MAX,
            ..Theme::default()
        };
        assert_eq!(theme.low_time_seconds(), u64::MAX);
    }
}
