//! Alert dispatch module
//!
//! Maps detected edge transitions to audio and visual alert triggers, and
//! owns the audio output thread with its unlock gate.

pub mod audio;
pub mod dispatcher;

// Re-export main types
pub use audio::{AudioGate, AudioOutput};
pub use dispatcher::{AlertEvent, AlertKind, AudioSource};
