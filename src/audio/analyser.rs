// src/audio/analyser.rs
//! Frequency/time-domain analysis over the shared sample ring buffer.
//!
//! Fixed 256-point transform with a 0.8 smoothing constant for the lifetime
//! of the graph. Output is byte-scaled the way the rest of the renderer
//! expects: frequency bins map the [-100, -30] dB window onto 0..255, and
//! time-domain samples center on 128.

use std::sync::{Arc, Mutex};

use ringbuf::{HeapRb, traits::*};
use rustfft::{FftPlanner, num_complex::Complex};

/// Transform size, fixed for the lifetime of the graph.
pub const FFT_SIZE: usize = 256;
/// Number of frequency bins produced per frame.
pub const BIN_COUNT: usize = FFT_SIZE / 2;
/// Smoothing constant applied to linear magnitudes across frames.
pub const SMOOTHING: f32 = 0.8;

const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// Produces frequency- and time-domain sample arrays from the live signal.
///
/// All buffers are preallocated once; refreshing a frame performs no
/// allocation.
pub struct Analyser {
    source: Arc<Mutex<HeapRb<f32>>>,
    planner: FftPlanner<f32>,
    /// Most recent FFT_SIZE raw samples copied out of the ring.
    latest: Vec<f32>,
    /// Windowed FFT scratch space.
    scratch: Vec<Complex<f32>>,
    /// Hann window coefficients, precomputed.
    window: Vec<f32>,
    /// Smoothed linear magnitudes carried across frames.
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(source: Arc<Mutex<HeapRb<f32>>>) -> Self {
        let window = (0..FFT_SIZE)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos())
            })
            .collect();
        Self {
            source,
            planner: FftPlanner::new(),
            latest: vec![0.0; FFT_SIZE],
            scratch: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            window,
            smoothed: vec![0.0; BIN_COUNT],
        }
    }

    /// Copy the most recent FFT_SIZE samples out of the ring buffer.
    /// Returns false when the analysis window is not yet full.
    fn capture_latest(&mut self) -> bool {
        let Ok(buf) = self.source.lock() else {
            return false;
        };
        let available = buf.occupied_len();
        if available < FFT_SIZE {
            return false;
        }
        let skip = available - FFT_SIZE;
        for (slot, &sample) in self.latest.iter_mut().zip(buf.iter().skip(skip)) {
            *slot = sample;
        }
        true
    }

    /// Fill `out` (length BIN_COUNT) with byte-scaled frequency magnitudes.
    /// Returns false and leaves `out` untouched when not enough signal has
    /// been captured yet.
    pub fn fill_byte_frequency(&mut self, out: &mut [u8]) -> bool {
        if !self.capture_latest() {
            return false;
        }

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            *slot = Complex::new(self.latest[i] * self.window[i], 0.0);
        }
        let fft = self.planner.plan_fft_forward(FFT_SIZE);
        fft.process(&mut self.scratch);

        // Normalize by FFT size, smooth linear magnitudes across frames,
        // then byte-scale the dB window.
        let scale = 1.0 / FFT_SIZE as f32;
        for (i, value) in out.iter_mut().take(BIN_COUNT).enumerate() {
            let c = self.scratch[i];
            let magnitude = (c.re * c.re + c.im * c.im).sqrt() * scale;
            self.smoothed[i] = SMOOTHING * self.smoothed[i] + (1.0 - SMOOTHING) * magnitude;
            let db = 20.0 * self.smoothed[i].max(1e-10).log10();
            let normalized = (db - MIN_DB) / (MAX_DB - MIN_DB);
            *value = (normalized.clamp(0.0, 1.0) * 255.0) as u8;
        }
        true
    }

    /// Fill `out` (length FFT_SIZE) with byte-scaled time-domain samples.
    pub fn fill_byte_time_domain(&mut self, out: &mut [u8]) -> bool {
        if !self.capture_latest() {
            return false;
        }
        for (value, &sample) in out.iter_mut().zip(self.latest.iter()) {
            *value = (sample.clamp(-1.0, 1.0) * 128.0 + 128.0).clamp(0.0, 255.0) as u8;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_with(samples: &[f32]) -> Arc<Mutex<HeapRb<f32>>> {
        let ring = Arc::new(Mutex::new(HeapRb::<f32>::new(4096)));
        {
            let mut buf = ring.lock().unwrap();
            for &s in samples {
                let _ = buf.try_push(s);
            }
        }
        ring
    }

    #[test]
    fn not_enough_samples_reports_false() {
        let ring = ring_with(&[0.5; 100]);
        let mut analyser = Analyser::new(ring);
        let mut out = [0u8; BIN_COUNT];
        assert!(!analyser.fill_byte_frequency(&mut out));
    }

    #[test]
    fn silence_yields_zero_bins() {
        let ring = ring_with(&[0.0; 512]);
        let mut analyser = Analyser::new(ring);
        let mut out = [0u8; BIN_COUNT];
        assert!(analyser.fill_byte_frequency(&mut out));
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn tone_concentrates_energy_in_its_bin() {
        // A full-scale tone in bin 8 of a 256-point transform.
        let samples: Vec<f32> = (0..512)
            .map(|i| (std::f32::consts::TAU * 8.0 * i as f32 / FFT_SIZE as f32).sin())
            .collect();
        let ring = ring_with(&samples);
        let mut analyser = Analyser::new(ring);
        let mut out = [0u8; BIN_COUNT];
        // Several frames so smoothing converges toward the live magnitude.
        for _ in 0..20 {
            assert!(analyser.fill_byte_frequency(&mut out));
        }
        let peak_bin = out
            .iter()
            .enumerate()
            .max_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 8);
        assert!(out[8] > 100);
    }

    #[test]
    fn time_domain_centers_on_128() {
        let ring = ring_with(&[0.0; 512]);
        let mut analyser = Analyser::new(ring);
        let mut out = [0u8; FFT_SIZE];
        assert!(analyser.fill_byte_time_domain(&mut out));
        assert!(out.iter().all(|&v| v == 128));
    }
}
