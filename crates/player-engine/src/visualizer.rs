//! Repeating sampling task that reduces frequency data to bar heights.
//!
//! The task runs at display cadence and writes a plain shared cell, not a
//! tracked/reactive value; consumers poll the cell at whatever cadence suits
//! them.  Each tick does O(1) bounded work.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

use crate::analyzer::BIN_COUNT;
use crate::audio_graph::VizSource;

/// Number of displayed bars.
pub const BAR_COUNT: usize = 30;
/// Minimum bar height; bars never collapse to invisible.
pub const BAR_FLOOR: f32 = 5.0;

/// One tick per display refresh (~60 Hz).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Shared cell holding the current bar heights, each in `[BAR_FLOOR, 100]`.
///
/// Writes carry the generation the sampling task was started under; a write
/// from a tick that raced a `stop()` is discarded, so the reset is always the
/// last word.
#[derive(Clone)]
pub struct BarHeights {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    bars: [f32; BAR_COUNT],
    generation: u64,
}

impl BarHeights {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                bars: [BAR_FLOOR; BAR_COUNT],
                generation: 0,
            })),
        }
    }

    pub fn get(&self) -> [f32; BAR_COUNT] {
        self.inner
            .lock()
            .map(|inner| inner.bars)
            .unwrap_or([BAR_FLOOR; BAR_COUNT])
    }

    fn generation(&self) -> u64 {
        self.inner.lock().map(|inner| inner.generation).unwrap_or(0)
    }

    /// Publish new heights unless a reset happened since `generation`.
    fn publish(&self, generation: u64, heights: [f32; BAR_COUNT]) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.generation == generation {
                inner.bars = heights;
            }
        }
    }

    /// Reset to the floor and invalidate in-flight writers.
    fn reset(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.generation += 1;
            inner.bars = [BAR_FLOOR; BAR_COUNT];
        }
    }
}

pub struct VisualizerLoop {
    bars: BarHeights,
    task: Option<AbortHandle>,
}

impl VisualizerLoop {
    pub fn new() -> Self {
        Self {
            bars: BarHeights::new(),
            task: None,
        }
    }

    /// Handle for consumers polling the current heights.
    pub fn bars(&self) -> BarHeights {
        self.bars.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start sampling.  No-op when the graph is uninitialized (`source` is
    /// `None`) or when already running.
    pub fn start(&mut self, source: Option<VizSource>) {
        let Some(source) = source else {
            debug!("visualizer start skipped: audio graph uninitialized");
            return;
        };
        if self.task.is_some() {
            return;
        }

        let bars = self.bars.clone();
        let generation = bars.generation();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            let mut sample = [0u8; BIN_COUNT];
            loop {
                ticker.tick().await;
                source.fill_bytes(&mut sample);

                let mut heights = [BAR_FLOOR; BAR_COUNT];
                for (height, &byte) in heights.iter_mut().zip(sample.iter()) {
                    *height = (byte as f32 / 255.0 * 100.0).max(BAR_FLOOR);
                }
                bars.publish(generation, heights);
            }
        });
        self.task = Some(handle.abort_handle());
    }

    /// Cancel the pending tick and reset the bars.  Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.bars.reset();
    }
}

impl Default for VisualizerLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_graph::AudioGraph;
    use crate::media::{MediaElement, MediaError, PcmTap};

    struct SineMedia {
        tap: PcmTap,
    }

    impl SineMedia {
        fn new() -> Self {
            let tap = PcmTap::new();
            let samples: Vec<f32> = (0..4096)
                .map(|i| (i as f32 / 44100.0 * 1000.0 * 2.0 * std::f32::consts::PI).sin())
                .collect();
            tap.push_samples(&samples);
            Self { tap }
        }
    }

    impl MediaElement for SineMedia {
        fn request_play(&mut self) -> Result<(), MediaError> {
            Ok(())
        }
        fn request_pause(&mut self) {}
        fn is_paused(&self) -> bool {
            true
        }
        fn set_volume(&mut self, _volume: f32) {}
        fn set_muted(&mut self, _muted: bool) {}
        fn attach_tap(&mut self) -> Result<PcmTap, MediaError> {
            Ok(self.tap.clone())
        }
    }

    fn running_source() -> Option<crate::audio_graph::VizSource> {
        let mut media = SineMedia::new();
        let mut graph = AudioGraph::new();
        graph.ensure_initialized(&mut media);
        graph.resume_if_suspended();
        graph.viz_source()
    }

    #[test]
    fn test_stale_publish_after_reset_is_discarded() {
        let bars = BarHeights::new();
        let generation = bars.generation();
        bars.reset();
        bars.publish(generation, [50.0; BAR_COUNT]);
        assert_eq!(bars.get(), [BAR_FLOOR; BAR_COUNT]);
    }

    #[tokio::test]
    async fn test_start_without_graph_is_noop() {
        let mut viz = VisualizerLoop::new();
        viz.start(None);
        assert!(!viz.is_running());
        assert_eq!(viz.bars().get(), [BAR_FLOOR; BAR_COUNT]);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut viz = VisualizerLoop::new();
        viz.stop();
        viz.stop();
        assert!(!viz.is_running());
        assert_eq!(viz.bars().get(), [BAR_FLOOR; BAR_COUNT]);
    }

    #[tokio::test]
    async fn test_start_is_idempotent_while_running() {
        let mut viz = VisualizerLoop::new();
        viz.start(running_source());
        assert!(viz.is_running());
        viz.start(running_source());
        assert!(viz.is_running());
        viz.stop();
    }

    #[tokio::test]
    async fn test_published_bars_stay_in_range() {
        let mut viz = VisualizerLoop::new();
        viz.start(running_source());

        // let a few frames elapse
        tokio::time::sleep(Duration::from_millis(120)).await;
        let bars = viz.bars().get();
        assert_eq!(bars.len(), BAR_COUNT);
        assert!(bars.iter().all(|&h| (BAR_FLOOR..=100.0).contains(&h)));
        assert!(
            bars.iter().any(|&h| h > BAR_FLOOR),
            "live sine should lift some bars: {bars:?}"
        );

        viz.stop();
        assert_eq!(viz.bars().get(), [BAR_FLOOR; BAR_COUNT]);
    }
}
