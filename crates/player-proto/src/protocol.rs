use serde::{Deserialize, Serialize};

/// Commands a UI layer may issue against the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd")]
pub enum Command {
    TogglePlayPause,
    Volume { value: f32 },
    ToggleMute,
}

/// Playback status as reflected from the media element.
///
/// The element is the source of truth for actual playback: the engine only
/// moves to `Playing` when the element reports audio flowing, not when the
/// user asks for it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle, // nothing requested yet
    Playing, // element confirmed audio flowing
    Paused,  // element paused
    Errored, // play rejected or element error
}

/// Full player state snapshot.  `rev` is a monotonically increasing counter
/// incremented every time the state changes.  Clients can use it to detect
/// missed updates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerState {
    /// Monotonic revision counter — incremented on every state change.
    #[serde(default)]
    pub rev: u64,
    pub status: PlaybackStatus,
    /// Whether audio is flowing (separate from `status` for clarity).
    #[serde(default)]
    pub is_playing: bool,
    pub muted: bool,
    pub volume: f32,
    /// True after a rejected play request or an element error; cleared only
    /// when the element reports playback again.
    pub errored: bool,
}

/// Volume indicator tier, derived purely from `(muted, volume)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VolumeTier {
    Muted,
    Low,
    High,
}

impl VolumeTier {
    pub fn from_volume(muted: bool, volume: f32) -> Self {
        if muted || volume == 0.0 {
            VolumeTier::Muted
        } else if volume < 0.5 {
            VolumeTier::Low
        } else {
            VolumeTier::High
        }
    }

    /// Icon name for UI layers (font-awesome style).
    pub fn icon_name(&self) -> &'static str {
        match self {
            VolumeTier::Muted => "volume-xmark",
            VolumeTier::Low => "volume-low",
            VolumeTier::High => "volume-high",
        }
    }
}
