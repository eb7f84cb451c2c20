//! PlayerCore — single-owner event loop for all mutable playback state.
//!
//! All inputs (UI commands and media lifecycle events) arrive as
//! [`PlayerEvent`] messages on one channel.  PlayerCore owns the media
//! element, the audio graph, the visualizer and the state cell exclusively;
//! nothing else touches them.  After each event that mutates state it
//! broadcasts [`EngineMessage::StateUpdated`] to all listeners.
//!
//! Playback state is **element-observation-driven**: a play request only
//! records an intent; the state flips to Playing (and the visualizer starts)
//! when the element itself reports audio flowing.  This avoids starting the
//! visualizer before data flows, or leaving it running after an unreported
//! stall.

use player_proto::config::Config;
use player_proto::protocol::Command;
use player_proto::state::StateCell;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::audio_graph::AudioGraph;
use crate::facade::PlayerFacade;
use crate::media::{MediaElement, MediaEvent};
use crate::visualizer::VisualizerLoop;
use crate::EngineMessage;

// ── PlayerEvent ──────────────────────────────────────────────────────────────

/// All inputs into the PlayerCore loop.
#[derive(Debug)]
pub enum PlayerEvent {
    /// A command from the UI layer.
    Command(Command),
    /// A lifecycle notification from the media element.
    Media(MediaEvent),
    /// Shutdown requested.
    Shutdown,
}

// ── PlayerCore ───────────────────────────────────────────────────────────────

pub struct PlayerCore<M: MediaElement> {
    media: M,
    graph: AudioGraph,
    visualizer: VisualizerLoop,
    state: StateCell,
    broadcast_tx: broadcast::Sender<EngineMessage>,
}

impl<M: MediaElement> PlayerCore<M> {
    pub fn new(mut media: M, config: &Config, broadcast_tx: broadcast::Sender<EngineMessage>) -> Self {
        let volume = config.player.default_volume.clamp(0.0, 1.0);
        media.set_volume(volume);

        Self {
            media,
            graph: AudioGraph::new(),
            visualizer: VisualizerLoop::new(),
            state: StateCell::new(volume),
            broadcast_tx,
        }
    }

    /// Borrow the state cell (for the facade).
    pub fn state_cell(&self) -> StateCell {
        self.state.clone()
    }

    /// Handle for the bar-heights cell (for the facade).
    pub fn bars(&self) -> crate::visualizer::BarHeights {
        self.visualizer.bars()
    }

    /// Run the core event loop.  Returns when a `Shutdown` event is received
    /// or the event channel is closed (all handles dropped).
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<PlayerEvent>) -> anyhow::Result<()> {
        info!("player core: starting event loop");

        loop {
            match event_rx.recv().await {
                None => {
                    info!("player core: event channel closed, shutting down");
                    break;
                }
                Some(PlayerEvent::Shutdown) => {
                    info!("player core: shutdown requested");
                    break;
                }
                Some(PlayerEvent::Command(cmd)) => {
                    info!("player core: command {:?}", cmd);
                    self.handle_command(cmd).await;
                }
                Some(PlayerEvent::Media(evt)) => {
                    debug!("media event: {:?}", evt);
                    self.apply_media_event(evt).await;
                }
            }
        }

        self.cleanup();
        Ok(())
    }

    // ── command handlers ─────────────────────────────────────────────────────

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::TogglePlayPause => self.toggle_play_pause().await,
            Command::Volume { value } => self.set_volume(value).await,
            Command::ToggleMute => self.toggle_mute().await,
        }
    }

    async fn toggle_play_pause(&mut self) {
        if self.media.is_paused() {
            // Graph setup and resume must happen inside this user-initiated
            // action, before the play request.
            self.graph.ensure_initialized(&mut self.media);
            self.graph.resume_if_suspended();

            if let Err(e) = self.media.request_play() {
                warn!("play request rejected: {e}");
                self.state.on_error().await;
                self.broadcast();
            }
            // On success nothing changes yet: the element will report
            // `Playing` once audio actually flows.
        } else {
            self.media.request_pause();
        }
    }

    async fn set_volume(&mut self, value: f32) {
        let value = self.state.set_volume(value).await;
        self.media.set_volume(value);

        // Entering nonzero volume always implies audible output.
        if value > 0.0 && self.state.get_state().await.muted {
            self.state.set_muted(false).await;
            self.media.set_muted(false);
        }
        self.broadcast();
    }

    async fn toggle_mute(&mut self) {
        let muted = self.state.toggle_muted().await;
        self.media.set_muted(muted);
        self.broadcast();
    }

    // ── media event reactions ────────────────────────────────────────────────

    async fn apply_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Playing => {
                self.state.on_playing().await;
                self.visualizer.start(self.graph.viz_source());
            }
            MediaEvent::Pause => {
                self.state.on_pause().await;
                self.visualizer.stop();
            }
            MediaEvent::Error => {
                warn!("media element reported an error");
                self.state.on_error().await;
                self.visualizer.stop();
            }
        }
        self.broadcast();
    }

    // ── helpers ──────────────────────────────────────────────────────────────

    fn broadcast(&self) {
        let _ = self.broadcast_tx.send(EngineMessage::StateUpdated);
    }

    /// Teardown order is mandatory: stop the visualizer before releasing the
    /// graph, so no tick runs against a released analyzer.
    fn cleanup(&mut self) {
        info!("player core: cleanup");
        self.visualizer.stop();
        self.graph.teardown();
    }
}

// ── wiring ───────────────────────────────────────────────────────────────────

/// Spawn the engine around a media element.
///
/// Returns the facade for the UI layer plus the event sender the media
/// backend uses to report lifecycle events.  Dropping every sender shuts the
/// core down and releases the audio graph.
pub fn spawn_player<M: MediaElement>(
    media: M,
    config: &Config,
) -> (PlayerFacade, mpsc::Sender<PlayerEvent>) {
    let (broadcast_tx, _) = broadcast::channel::<EngineMessage>(64);
    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>(64);

    let core = PlayerCore::new(media, config, broadcast_tx.clone());
    let facade = PlayerFacade::new(
        event_tx.clone(),
        core.state_cell(),
        core.bars(),
        broadcast_tx,
    );

    tokio::spawn(async move {
        if let Err(e) = core.run(event_rx).await {
            error!("player core exited with error: {e}");
        }
    });

    (facade, event_tx)
}
