//! The externally observable surface of the player.
//!
//! A UI layer depends on nothing but this: read accessors over the state
//! snapshot and bar heights, the derived volume tier, and fire-and-forget
//! commands into the core.  Cheaply cloneable.

use player_proto::protocol::{Command, PlayerState, VolumeTier};
use player_proto::state::StateCell;
use tokio::sync::{broadcast, mpsc};

use crate::core::PlayerEvent;
use crate::visualizer::{BarHeights, BAR_COUNT};
use crate::EngineMessage;

#[derive(Clone)]
pub struct PlayerFacade {
    command_tx: mpsc::Sender<PlayerEvent>,
    state: StateCell,
    bars: BarHeights,
    broadcast_tx: broadcast::Sender<EngineMessage>,
}

impl PlayerFacade {
    pub(crate) fn new(
        command_tx: mpsc::Sender<PlayerEvent>,
        state: StateCell,
        bars: BarHeights,
        broadcast_tx: broadcast::Sender<EngineMessage>,
    ) -> Self {
        Self {
            command_tx,
            state,
            bars,
            broadcast_tx,
        }
    }

    // ── signals ──────────────────────────────────────────────────────────────

    pub async fn snapshot(&self) -> PlayerState {
        self.state.get_state().await
    }

    pub async fn is_playing(&self) -> bool {
        self.state.get_state().await.is_playing
    }

    pub async fn is_muted(&self) -> bool {
        self.state.get_state().await.muted
    }

    pub async fn has_error(&self) -> bool {
        self.state.get_state().await.errored
    }

    pub async fn volume(&self) -> f32 {
        self.state.get_state().await.volume
    }

    /// Volume indicator tier, derived purely from `(muted, volume)`.
    pub async fn volume_tier(&self) -> VolumeTier {
        let state = self.state.get_state().await;
        VolumeTier::from_volume(state.muted, state.volume)
    }

    /// Current bar heights: exactly [`BAR_COUNT`] values in `[5, 100]`.
    /// Plain polled read; never blocks on the visualizer tick.
    pub fn bar_heights(&self) -> [f32; BAR_COUNT] {
        self.bars.get()
    }

    /// Subscribe to state-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineMessage> {
        self.broadcast_tx.subscribe()
    }

    // ── commands ─────────────────────────────────────────────────────────────

    pub async fn toggle_play_pause(&self) {
        self.send(Command::TogglePlayPause).await;
    }

    pub async fn set_volume(&self, value: f32) {
        self.send(Command::Volume { value }).await;
    }

    pub async fn toggle_mute(&self) {
        self.send(Command::ToggleMute).await;
    }

    async fn send(&self, cmd: Command) {
        let _ = self.command_tx.send(PlayerEvent::Command(cmd)).await;
    }
}
