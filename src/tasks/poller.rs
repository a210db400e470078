//! Snapshot polling background task

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{
    alert::audio::AudioOutput,
    alert::dispatcher::trigger_alerts,
    config::Config,
    render::surface::DisplaySurface,
    state::{Snapshot, ViewerState},
};

/// Poll the status endpoint forever and drive the display.
///
/// Each tick issues one request tagged with a client-side monotonically
/// increasing sequence number; completions come back over a channel and are
/// applied in arrival order. Policy for overlap: at most one request is in
/// flight, so a tick that lands while one is outstanding is skipped, and the
/// sequence check in `apply_snapshot` drops anything that would still arrive
/// out of order. Transport failures are logged and the next tick proceeds;
/// nothing here stops the loop.
pub async fn snapshot_poll_task<S: DisplaySurface>(
    state: Arc<ViewerState>,
    client: reqwest::Client,
    config: Arc<Config>,
    audio: AudioOutput,
    mut surface: S,
) {
    info!(
        "Starting snapshot poll task against {} every {}ms",
        config.status_url(),
        config.poll_interval_ms
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut interval = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut next_seq: u64 = 0;
    let mut in_flight = false;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if in_flight {
                    debug!("Previous poll still in flight, skipping tick");
                    continue;
                }
                in_flight = true;
                next_seq += 1;

                let tx = tx.clone();
                let client = client.clone();
                let url = config.status_url();
                let seq = next_seq;
                tokio::spawn(async move {
                    let result = fetch_snapshot(&client, &url).await;
                    // The receiver only goes away when the loop itself does.
                    let _ = tx.send((seq, result));
                });
            }

            Some((seq, result)) = rx.recv() => {
                in_flight = false;
                match result {
                    Ok(snapshot) => {
                        match state.apply_snapshot(seq, &snapshot) {
                            Ok(Some(outcome)) => {
                                trigger_alerts(outcome.alerts, &client, &config, &audio);
                                surface.apply(&outcome.frame);
                            }
                            Ok(None) => {
                                // Stale response, already superseded.
                            }
                            Err(e) => error!("Failed to apply snapshot: {}", e),
                        }
                    }
                    Err(e) => warn!("Timer status poll failed: {}", e),
                }
            }
        }
    }
}

/// One read of the status endpoint.
///
/// Connect errors, non-success statuses, and non-JSON bodies all surface
/// here as errors for the caller to log and skip.
async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> anyhow::Result<Snapshot> {
    let response = client.get(url).send().await?.error_for_status()?;
    let snapshot = response.json::<Snapshot>().await?;
    Ok(snapshot)
}
