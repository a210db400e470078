//! Mapping of detected edge transitions to alert events

use std::sync::Arc;

use tracing::{debug, warn};

use super::audio::AudioOutput;
use crate::config::Config;
use crate::state::snapshot::Snapshot;
use crate::state::tracker::EdgeReport;

/// The two alert kinds the display can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    TimesUp,
    LowTime,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::TimesUp => "times-up",
            AlertKind::LowTime => "low-time",
        }
    }
}

/// Sound selected for one alert trigger, resolved once per transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Custom uploaded sound, addressed by the filename from the snapshot
    Custom(String),
    /// Built-in synthesized tone pattern
    SynthesizedDefault(AlertKind),
}

/// One alert trigger for one timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub timer_id: String,
    pub kind: AlertKind,
    pub audio: AudioSource,
}

/// Pick the audio source for an alert kind from the snapshot's configured
/// sound filenames.
pub fn resolve_audio_source(kind: AlertKind, snapshot: &Snapshot) -> AudioSource {
    let custom = match kind {
        AlertKind::TimesUp => snapshot.times_up_sound.as_ref(),
        AlertKind::LowTime => snapshot.low_time_sound.as_ref(),
    };
    match custom {
        Some(filename) => AudioSource::Custom(filename.clone()),
        None => AudioSource::SynthesizedDefault(kind),
    }
}

/// Turn one timer's edge report into zero or more alert events.
///
/// Rising edges only; the global warning switch mutes everything. Repeated
/// snapshots inside a run produce no edges, so at-most-once per transition
/// holds by construction.
pub fn collect_alerts(timer_id: &str, edges: &EdgeReport, snapshot: &Snapshot) -> Vec<AlertEvent> {
    if !snapshot.theme.warning_enabled {
        return Vec::new();
    }

    let mut events = Vec::new();
    if edges.entered_times_up {
        events.push(AlertEvent {
            timer_id: timer_id.to_string(),
            kind: AlertKind::TimesUp,
            audio: resolve_audio_source(AlertKind::TimesUp, snapshot),
        });
    }
    if edges.entered_low_time {
        events.push(AlertEvent {
            timer_id: timer_id.to_string(),
            kind: AlertKind::LowTime,
            audio: resolve_audio_source(AlertKind::LowTime, snapshot),
        });
    }
    events
}

/// Play the audio side of a batch of alert events.
///
/// The visual side is already carried by the display frame; nothing here may
/// block or fail the render path. A locked audio gate skips playback
/// entirely, and a custom sound that cannot be fetched falls back to the
/// default tone for its kind.
pub fn trigger_alerts(
    events: Vec<AlertEvent>,
    client: &reqwest::Client,
    config: &Arc<Config>,
    audio: &AudioOutput,
) {
    for event in events {
        debug!(
            "Timer {} raised {} alert",
            event.timer_id,
            event.kind.as_str()
        );

        if !audio.is_unlocked() {
            debug!(
                "Audio output still locked, skipping {} playback",
                event.kind.as_str()
            );
            continue;
        }

        match event.audio {
            AudioSource::SynthesizedDefault(kind) => audio.play_default(kind),
            AudioSource::Custom(filename) => {
                let url = config.audio_url(&filename);
                let client = client.clone();
                let audio = audio.clone();
                let kind = event.kind;
                tokio::spawn(async move {
                    match fetch_sound(&client, &url).await {
                        Ok(bytes) => audio.play_custom(kind, bytes),
                        Err(e) => {
                            warn!(
                                "Failed to load custom {} sound from {}: {}, using default tone",
                                kind.as_str(),
                                url,
                                e
                            );
                            audio.play_default(kind);
                        }
                    }
                });
            }
        }
    }
}

async fn fetch_sound(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
