//! Media element boundary.
//!
//! The playable element (network stack, decoder, output device) lives outside
//! this engine.  It is driven through the [`MediaElement`] trait and reports
//! back through [`MediaEvent`] messages injected into the core's event
//! channel; the element is the source of truth for actual playback state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Rolling tap capacity: ~93 ms of mono audio at 44100 Hz.
const TAP_CAPACITY: usize = 4096;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The environment refused a play request (autoplay policy, network
    /// failure).  Recoverable by retrying.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
    /// The platform cannot capture the element's output at all.
    #[error("audio capture unavailable: {0}")]
    CaptureUnavailable(String),
    /// The element's output is already bound to another analysis graph.
    #[error("element output already captured by another graph")]
    AlreadyCaptured,
}

/// Lifecycle notifications from the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// Audio started flowing.
    Playing,
    /// Playback paused.
    Pause,
    /// The element hit a runtime error (e.g. stream drop).
    Error,
}

/// A playable media element bound to the fixed stream URL.
///
/// `request_play` may be rejected immediately; runtime failures arrive later
/// as [`MediaEvent::Error`].  `attach_tap` grants the audio graph a read-only
/// tap on the element's output without altering what the listener hears.
pub trait MediaElement: Send + 'static {
    fn request_play(&mut self) -> Result<(), MediaError>;
    fn request_pause(&mut self);
    fn is_paused(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn attach_tap(&mut self) -> Result<PcmTap, MediaError>;
}

/// Cheaply cloneable handle over a rolling buffer of normalised mono f32
/// samples tapped from the element output.  The backend pushes; the analyzer
/// reads the most recent window.
#[derive(Clone, Default)]
pub struct PcmTap {
    ring: Arc<Mutex<VecDeque<f32>>>,
}

impl PcmTap {
    pub fn new() -> Self {
        Self {
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(TAP_CAPACITY))),
        }
    }

    /// Append samples, trimming the front beyond capacity.
    pub fn push_samples(&self, samples: &[f32]) {
        if let Ok(mut ring) = self.ring.lock() {
            for &s in samples {
                if ring.len() >= TAP_CAPACITY {
                    ring.pop_front();
                }
                ring.push_back(s);
            }
        }
    }

    /// Copy the most recent `n` samples, zero-padded at the front when fewer
    /// have arrived.
    pub fn latest(&self, n: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; n];
        if let Ok(ring) = self.ring.lock() {
            let skip = ring.len().saturating_sub(n);
            let offset = n.saturating_sub(ring.len().min(n));
            for (i, &s) in ring.iter().skip(skip).enumerate() {
                out[offset + i] = s;
            }
        }
        out
    }
}
