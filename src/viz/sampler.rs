// src/viz/sampler.rs
//! Per-frame sample acquisition for the render loop.
//!
//! Owns the analyser plus preallocated byte arrays so the hot path never
//! allocates. Frequency data is refreshed every frame; time-domain data only
//! when the active style asks for it.

use std::sync::{Arc, Mutex};

use ringbuf::HeapRb;

use crate::audio::analyser::{Analyser, BIN_COUNT, FFT_SIZE};

pub struct FrameSampler {
    analyser: Analyser,
    freq: Vec<u8>,
    time: Vec<u8>,
    /// Whether at least one full frequency frame has been produced.
    have_frame: bool,
}

impl FrameSampler {
    pub fn new(source: Arc<Mutex<HeapRb<f32>>>) -> Self {
        Self {
            analyser: Analyser::new(source),
            freq: vec![0; BIN_COUNT],
            time: vec![128; FFT_SIZE],
            have_frame: false,
        }
    }

    /// Refresh the frequency array from the live signal. Returns false when
    /// no full analysis window is available yet, in which case the previous
    /// frame's data is kept.
    pub fn refresh(&mut self) -> bool {
        if self.analyser.fill_byte_frequency(&mut self.freq) {
            self.have_frame = true;
        }
        self.have_frame
    }

    /// Refresh the time-domain array. Only called for waveform styles.
    pub fn refresh_time_domain(&mut self) {
        let _ = self.analyser.fill_byte_time_domain(&mut self.time);
    }

    pub fn frequency(&self) -> &[u8] {
        &self.freq
    }

    pub fn time_domain(&self) -> &[u8] {
        &self.time
    }
}

#[cfg(test)]
mod tests {
    use ringbuf::traits::*;

    use super::*;

    #[test]
    fn refresh_reports_false_until_window_fills() {
        let ring = Arc::new(Mutex::new(HeapRb::<f32>::new(4096)));
        let mut sampler = FrameSampler::new(ring.clone());
        assert!(!sampler.refresh());

        {
            let mut buf = ring.lock().unwrap();
            for _ in 0..FFT_SIZE {
                let _ = buf.try_push(0.5);
            }
        }
        assert!(sampler.refresh());
        // Once a frame exists it stays valid even if the ring drains.
        ring.lock().unwrap().clear();
        assert!(sampler.refresh());
    }

    #[test]
    fn time_domain_defaults_to_center() {
        let ring = Arc::new(Mutex::new(HeapRb::<f32>::new(4096)));
        let sampler = FrameSampler::new(ring);
        assert!(sampler.time_domain().iter().all(|&v| v == 128));
    }
}
