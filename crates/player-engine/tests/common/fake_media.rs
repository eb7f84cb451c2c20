//! Scripted media element for integration tests.
//!
//! The element itself moves into the player core; tests keep a [`MediaProbe`]
//! to script rejections and observe the mirrored element properties.

use std::sync::{Arc, Mutex};

use player_engine::media::{MediaElement, MediaError, PcmTap};

struct Inner {
    paused: bool,
    volume: f32,
    muted: bool,
    reject_play: bool,
    tap_available: bool,
    tap: Option<PcmTap>,
    play_requests: u32,
}

pub struct FakeMedia {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Clone)]
pub struct MediaProbe {
    inner: Arc<Mutex<Inner>>,
}

impl FakeMedia {
    pub fn new() -> (Self, MediaProbe) {
        let inner = Arc::new(Mutex::new(Inner {
            paused: true,
            volume: 0.0,
            muted: false,
            reject_play: false,
            tap_available: true,
            tap: None,
            play_requests: 0,
        }));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            MediaProbe { inner },
        )
    }
}

impl MediaElement for FakeMedia {
    fn request_play(&mut self) -> Result<(), MediaError> {
        let mut inner = self.inner.lock().unwrap();
        inner.play_requests += 1;
        if inner.reject_play {
            return Err(MediaError::PlaybackRejected("autoplay blocked".into()));
        }
        inner.paused = false;
        Ok(())
    }

    fn request_pause(&mut self) {
        self.inner.lock().unwrap().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.inner.lock().unwrap().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.lock().unwrap().muted = muted;
    }

    fn attach_tap(&mut self) -> Result<PcmTap, MediaError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.tap_available {
            return Err(MediaError::CaptureUnavailable("capture disabled".into()));
        }
        if inner.tap.is_some() {
            return Err(MediaError::AlreadyCaptured);
        }
        let tap = PcmTap::new();
        inner.tap = Some(tap.clone());
        Ok(tap)
    }
}

impl MediaProbe {
    pub fn set_reject_play(&self, reject: bool) {
        self.inner.lock().unwrap().reject_play = reject;
    }

    pub fn set_tap_available(&self, available: bool) {
        self.inner.lock().unwrap().tap_available = available;
    }

    pub fn paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    pub fn volume(&self) -> f32 {
        self.inner.lock().unwrap().volume
    }

    pub fn muted(&self) -> bool {
        self.inner.lock().unwrap().muted
    }

    pub fn play_requests(&self) -> u32 {
        self.inner.lock().unwrap().play_requests
    }

    /// The tap handed to the audio graph, once attached.
    pub fn tap(&self) -> Option<PcmTap> {
        self.inner.lock().unwrap().tap.clone()
    }
}
