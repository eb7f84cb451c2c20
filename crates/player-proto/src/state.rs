use crate::protocol::{PlaybackStatus, PlayerState};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared player state with named-event transition methods.
///
/// The engine core is the only writer; facades hold clones for reading.
/// Every mutation bumps `rev`.  Transitions keep the invariant that
/// `errored` implies `is_playing == false`.
#[derive(Clone)]
pub struct StateCell {
    state: Arc<RwLock<PlayerState>>,
}

impl StateCell {
    pub fn new(volume: f32) -> Self {
        let state = PlayerState {
            rev: 1,
            status: PlaybackStatus::Idle,
            is_playing: false,
            muted: false,
            volume: volume.clamp(0.0, 1.0),
            errored: false,
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn get_state(&self) -> PlayerState {
        self.state.read().await.clone()
    }

    /// The element confirmed audio is flowing.
    pub async fn on_playing(&self) {
        let mut state = self.state.write().await;
        state.status = PlaybackStatus::Playing;
        state.is_playing = true;
        state.errored = false;
        state.rev += 1;
    }

    /// The element paused.  The error flag is left untouched so a stalled
    /// stream stays visible as errored even after the element settles.
    pub async fn on_pause(&self) {
        let mut state = self.state.write().await;
        state.status = PlaybackStatus::Paused;
        state.is_playing = false;
        state.rev += 1;
    }

    /// A play request was rejected or the element reported a runtime error.
    pub async fn on_error(&self) {
        let mut state = self.state.write().await;
        state.status = PlaybackStatus::Errored;
        state.is_playing = false;
        state.errored = true;
        state.rev += 1;
    }

    /// Record a new volume.  Returns the clamped value actually stored.
    pub async fn set_volume(&self, volume: f32) -> f32 {
        let mut state = self.state.write().await;
        state.volume = volume.clamp(0.0, 1.0);
        state.rev += 1;
        state.volume
    }

    pub async fn set_muted(&self, muted: bool) {
        let mut state = self.state.write().await;
        state.muted = muted;
        state.rev += 1;
    }

    /// Flip the muted flag; returns the new value.
    pub async fn toggle_muted(&self) -> bool {
        let mut state = self.state.write().await;
        state.muted = !state.muted;
        state.rev += 1;
        state.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state() {
        let cell = StateCell::new(0.75);
        let state = cell.get_state().await;
        assert_eq!(state.status, PlaybackStatus::Idle);
        assert!(!state.is_playing);
        assert!(!state.muted);
        assert!(!state.errored);
        assert_eq!(state.volume, 0.75);
    }

    #[tokio::test]
    async fn test_error_implies_not_playing() {
        let cell = StateCell::new(0.75);
        cell.on_playing().await;
        assert!(cell.get_state().await.is_playing);

        cell.on_error().await;
        let state = cell.get_state().await;
        assert!(state.errored);
        assert!(!state.is_playing);
        assert_eq!(state.status, PlaybackStatus::Errored);
    }

    #[tokio::test]
    async fn test_playing_clears_error() {
        let cell = StateCell::new(0.5);
        cell.on_error().await;
        cell.on_playing().await;
        let state = cell.get_state().await;
        assert!(!state.errored);
        assert!(state.is_playing);
    }

    #[tokio::test]
    async fn test_pause_keeps_error_flag() {
        let cell = StateCell::new(0.5);
        cell.on_error().await;
        cell.on_pause().await;
        let state = cell.get_state().await;
        assert!(state.errored);
        assert!(!state.is_playing);
        assert_eq!(state.status, PlaybackStatus::Paused);
    }

    #[tokio::test]
    async fn test_toggle_muted_involution() {
        let cell = StateCell::new(0.5);
        let before = cell.get_state().await.muted;
        cell.toggle_muted().await;
        cell.toggle_muted().await;
        assert_eq!(cell.get_state().await.muted, before);
    }

    #[tokio::test]
    async fn test_volume_clamped() {
        let cell = StateCell::new(0.5);
        assert_eq!(cell.set_volume(1.7).await, 1.0);
        assert_eq!(cell.set_volume(-0.3).await, 0.0);
    }

    #[tokio::test]
    async fn test_rev_monotonic() {
        let cell = StateCell::new(0.5);
        let r0 = cell.get_state().await.rev;
        cell.on_playing().await;
        let r1 = cell.get_state().await.rev;
        cell.on_pause().await;
        let r2 = cell.get_state().await.rev;
        assert!(r0 < r1 && r1 < r2);
    }
}
