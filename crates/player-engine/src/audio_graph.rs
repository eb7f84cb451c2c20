//! Lazily constructed audio analysis chain: element tap → spectrum analyzer.
//!
//! The graph is a non-essential enhancement.  When the platform cannot
//! provide a tap, initialization fails silently from the caller's
//! perspective (logged, never surfaced) and playback proceeds without a
//! visualizer.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analyzer::{SpectrumAnalyzer, BIN_COUNT};
use crate::media::MediaElement;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("analysis context already closed")]
    ContextClosed,
}

// ── analysis context ─────────────────────────────────────────────────────────

/// Power state of the analysis context.  New contexts start `Suspended`
/// (platform policy: no output until a user-gesture-triggered resume).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended = 0,
    Running = 1,
    Closed = 2,
}

impl ContextState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ContextState::Running,
            2 => ContextState::Closed,
            _ => ContextState::Suspended,
        }
    }
}

pub struct AnalysisContext {
    state: AtomicU8,
}

impl AnalysisContext {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(ContextState::Suspended as u8),
        }
    }

    pub fn state(&self) -> ContextState {
        ContextState::from_u8(self.state.load(Ordering::Relaxed))
    }

    pub fn is_running(&self) -> bool {
        self.state() == ContextState::Running
    }

    fn resume(&self) {
        self.state
            .store(ContextState::Running as u8, Ordering::Relaxed);
    }

    fn close(&self) -> Result<(), GraphError> {
        if self.state() == ContextState::Closed {
            return Err(GraphError::ContextClosed);
        }
        self.state
            .store(ContextState::Closed as u8, Ordering::Relaxed);
        Ok(())
    }
}

// ── graph ────────────────────────────────────────────────────────────────────

/// The one live handle: analysis context plus the analyzer, which holds the
/// source tap on the element output.
struct GraphHandle {
    context: Arc<AnalysisContext>,
    analyzer: Arc<Mutex<SpectrumAnalyzer>>,
}

/// What the visualizer task samples each tick.  Holds non-owning references
/// into the live graph handle.
#[derive(Clone)]
pub struct VizSource {
    context: Arc<AnalysisContext>,
    analyzer: Arc<Mutex<SpectrumAnalyzer>>,
}

impl VizSource {
    /// Fill `out` with current byte frequency data.  A context that is not
    /// running yields silence.
    pub fn fill_bytes(&self, out: &mut [u8; BIN_COUNT]) {
        if !self.context.is_running() {
            out.fill(0);
            return;
        }
        if let Ok(mut analyzer) = self.analyzer.lock() {
            analyzer.byte_frequency_data(out);
        }
    }
}

pub struct AudioGraph {
    handle: Option<GraphHandle>,
    torn_down: bool,
}

impl AudioGraph {
    pub fn new() -> Self {
        Self {
            handle: None,
            torn_down: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Build the chain on first need.  Idempotent once built; a failed
    /// attempt leaves the graph uninitialized so a later play retries.
    pub fn ensure_initialized<M: MediaElement>(&mut self, media: &mut M) {
        if self.handle.is_some() || self.torn_down {
            return;
        }

        let tap = match media.attach_tap() {
            Ok(tap) => tap,
            Err(e) => {
                warn!("audio graph unavailable, playing without visualizer: {e}");
                return;
            }
        };

        let analyzer = SpectrumAnalyzer::new(tap);
        self.handle = Some(GraphHandle {
            context: Arc::new(AnalysisContext::new()),
            analyzer: Arc::new(Mutex::new(analyzer)),
        });
        info!("audio graph initialized ({BIN_COUNT} bins)");
    }

    /// Resume a suspended context.  Must run inside the same user-initiated
    /// action that starts playback, or the platform ignores the resumption.
    pub fn resume_if_suspended(&self) {
        if let Some(handle) = &self.handle {
            if handle.context.state() == ContextState::Suspended {
                debug!("resuming suspended analysis context");
                handle.context.resume();
            }
        }
    }

    pub fn viz_source(&self) -> Option<VizSource> {
        self.handle.as_ref().map(|h| VizSource {
            context: Arc::clone(&h.context),
            analyzer: Arc::clone(&h.analyzer),
        })
    }

    /// Release the chain.  Node references drop here; closing the context is
    /// best-effort and never propagates.  Safe to call repeatedly; the graph
    /// is never rebuilt afterwards.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.context.close() {
                warn!("failed to close analysis context: {e}");
            }
        }
    }
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new()
    }
}
