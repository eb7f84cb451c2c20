//! Frequency-domain analysis of the tapped element output.
//!
//! A 64-sample transform window yields 32 bins.  Magnitudes are smoothed
//! against the previous frame and mapped into the 0..255 byte range over a
//! [-100, -30] dBFS window, so the byte output behaves like a conventional
//! analyser node's frequency data.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::media::PcmTap;

/// Samples analysed per frequency-domain snapshot.
pub const FFT_WINDOW: usize = 64;
/// Frequency bins produced per snapshot (window / 2).
pub const BIN_COUNT: usize = FFT_WINDOW / 2;

/// Smoothing against the previous frame, applied to linear magnitudes.
const SMOOTHING: f32 = 0.8;
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

pub struct SpectrumAnalyzer {
    tap: PcmTap,
    fft: Arc<dyn Fft<f32>>,
    /// Precomputed Hann window coefficients.
    window: [f32; FFT_WINDOW],
    scratch: [Complex<f32>; FFT_WINDOW],
    smoothed: [f32; BIN_COUNT],
}

impl SpectrumAnalyzer {
    pub fn new(tap: PcmTap) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_WINDOW);

        let mut window = [0.0f32; FFT_WINDOW];
        for (i, w) in window.iter_mut().enumerate() {
            *w = 0.5
                * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_WINDOW as f32).cos());
        }

        Self {
            tap,
            fft,
            window,
            scratch: [Complex::new(0.0, 0.0); FFT_WINDOW],
            smoothed: [0.0; BIN_COUNT],
        }
    }

    /// Fill `out` with the current byte frequency data.
    pub fn byte_frequency_data(&mut self, out: &mut [u8; BIN_COUNT]) {
        let samples = self.tap.latest(FFT_WINDOW);
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            *slot = Complex::new(samples[i] * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let norm = 2.0 / FFT_WINDOW as f32;
        for (i, byte) in out.iter_mut().enumerate() {
            let mag = self.scratch[i].norm() * norm;
            let smoothed = SMOOTHING * self.smoothed[i] + (1.0 - SMOOTHING) * mag;
            self.smoothed[i] = smoothed;
            *byte = byte_from_magnitude(smoothed);
        }
    }
}

fn byte_from_magnitude(mag: f32) -> u8 {
    if mag < 1e-10 {
        return 0;
    }
    let db = 20.0 * mag.log10();
    let norm = ((db - MIN_DB) / (MAX_DB - MIN_DB)).clamp(0.0, 1.0);
    (norm * 255.0).round() as u8
}
