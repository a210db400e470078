//! Audio output thread, gate, and default tone synthesis

use std::f32::consts::PI;
use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use super::dispatcher::AlertKind;

const SAMPLE_RATE: u32 = 44_100;
const TONE_AMPLITUDE: f32 = 0.4;

/// Readiness of the audio output.
///
/// Playback is gated behind the first user interaction; until then every
/// trigger is visual-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioGate {
    Locked,
    Unlocked,
}

enum AudioCommand {
    PlayCustom { kind: AlertKind, bytes: Vec<u8> },
    PlayDefault { kind: AlertKind },
}

/// Cloneable handle to the audio output thread.
///
/// The rodio output stream is not `Send`, so a dedicated thread owns it and
/// receives play commands over a channel. Each of the two players (custom
/// sound, synthesized tone) stops its previous playback before starting a
/// new one, so sounds never overlap on the same player.
#[derive(Clone)]
pub struct AudioOutput {
    tx: Sender<AudioCommand>,
    gate: Arc<Mutex<AudioGate>>,
}

impl AudioOutput {
    /// Spawn the audio thread and return a handle to it.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        if let Err(e) = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || audio_thread(rx))
        {
            warn!("Failed to spawn audio thread: {}", e);
        }
        Self {
            tx,
            gate: Arc::new(Mutex::new(AudioGate::Locked)),
        }
    }

    /// Unlock the gate. Idempotent; only the first call does anything.
    pub fn unlock(&self) {
        if let Ok(mut gate) = self.gate.lock() {
            if *gate == AudioGate::Locked {
                *gate = AudioGate::Unlocked;
                info!("Audio output unlocked");
            }
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate
            .lock()
            .map(|gate| *gate == AudioGate::Unlocked)
            .unwrap_or(false)
    }

    /// Play a fetched custom sound on the custom player.
    pub fn play_custom(&self, kind: AlertKind, bytes: Vec<u8>) {
        self.send(AudioCommand::PlayCustom { kind, bytes });
    }

    /// Play the built-in tone pattern for an alert kind on the tone player.
    pub fn play_default(&self, kind: AlertKind) {
        self.send(AudioCommand::PlayDefault { kind });
    }

    fn send(&self, command: AudioCommand) {
        if self.tx.send(command).is_err() {
            debug!("Audio thread is gone, dropping play command");
        }
    }
}

fn audio_thread(rx: Receiver<AudioCommand>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            // No device; keep draining so senders never block or error out.
            warn!("No audio output device available: {}", e);
            for _ in rx {}
            return;
        }
    };

    let mut custom_sink: Option<Sink> = None;
    let mut tone_sink: Option<Sink> = None;

    for command in rx {
        match command {
            AudioCommand::PlayCustom { kind, bytes } => {
                match Decoder::new(Cursor::new(bytes)) {
                    Ok(source) => {
                        play_on(&handle, &mut custom_sink, source.convert_samples::<f32>())
                    }
                    Err(e) => {
                        warn!(
                            "Failed to decode custom {} sound: {}, using default tone",
                            kind.as_str(),
                            e
                        );
                        play_on(&handle, &mut tone_sink, tone_buffer(kind));
                    }
                }
            }
            AudioCommand::PlayDefault { kind } => {
                play_on(&handle, &mut tone_sink, tone_buffer(kind));
            }
        }
    }
}

/// Stop whatever the player is currently doing and start the new source.
fn play_on<S>(handle: &OutputStreamHandle, slot: &mut Option<Sink>, source: S)
where
    S: Source<Item = f32> + Send + 'static,
{
    if let Some(old) = slot.take() {
        old.stop();
    }
    match Sink::try_new(handle) {
        Ok(sink) => {
            sink.append(source);
            *slot = Some(sink);
        }
        Err(e) => warn!("Failed to open audio sink: {}", e),
    }
}

fn tone_buffer(kind: AlertKind) -> SamplesBuffer<f32> {
    let samples = match kind {
        AlertKind::TimesUp => times_up_pattern(),
        AlertKind::LowTime => low_time_pattern(),
    };
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

/// Times-up default: four short deep beeps, the whole group repeated three
/// times.
pub fn times_up_pattern() -> Vec<f32> {
    let mut samples = Vec::new();
    for _ in 0..3 {
        for _ in 0..4 {
            append_tone(&mut samples, 180.0, 0.18);
            append_silence(&mut samples, 0.08);
        }
        append_silence(&mut samples, 0.35);
    }
    samples
}

/// Low-time default: three evenly spaced dings.
pub fn low_time_pattern() -> Vec<f32> {
    let mut samples = Vec::new();
    for _ in 0..3 {
        append_tone(&mut samples, 880.0, 0.12);
        append_silence(&mut samples, 0.25);
    }
    samples
}

/// Append a sine tone with a linear decay envelope.
fn append_tone(samples: &mut Vec<f32>, frequency: f32, seconds: f32) {
    let count = (SAMPLE_RATE as f32 * seconds) as usize;
    for i in 0..count {
        let t = i as f32 / SAMPLE_RATE as f32;
        let envelope = 1.0 - (i as f32 / count as f32);
        samples.push((2.0 * PI * frequency * t).sin() * TONE_AMPLITUDE * envelope);
    }
}

fn append_silence(samples: &mut Vec<f32>, seconds: f32) {
    let count = (SAMPLE_RATE as f32 * seconds) as usize;
    samples.extend(std::iter::repeat(0.0).take(count));
}

/// Unlock audio on the first byte of user input.
///
/// The native stand-in for the browser rule that an audio context only
/// starts after a click or touch.
pub async fn unlock_on_first_input(audio: AudioOutput) {
    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 1];
    match stdin.read(&mut buf).await {
        Ok(0) => debug!("Stdin closed before any input, audio stays locked"),
        Ok(_) => audio.unlock(),
        Err(e) => debug!("Failed to read stdin for audio unlock: {}", e),
    }
}
