// src/audio/gain.rs
//! Gain stage: a source wrapper scaled by a shared atomic gain scalar.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rodio::Source;

/// Shared handle to the routing graph's gain scalar.
///
/// Writes are last-write-wins; the volume synchronizer and the lifecycle
/// controller are the only writers and no locking is needed.
#[derive(Clone)]
pub struct GainControl(Arc<AtomicU32>);

impl GainControl {
    pub fn new(gain: f32) -> Self {
        Self(Arc::new(AtomicU32::new(gain.to_bits())))
    }

    pub fn set(&self, gain: f32) {
        self.0.store(gain.max(0.0).to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// A wrapper source that multiplies every sample by the shared gain.
/// Sits between the analysis tap and the output so the tap itself never
/// changes perceived loudness.
pub struct GainStage<S> {
    source: S,
    gain: GainControl,
}

impl<S> GainStage<S> {
    pub fn new(source: S, gain: GainControl) -> Self {
        Self { source, gain }
    }
}

impl<S> Iterator for GainStage<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next().map(|sample| sample * self.gain.get())
    }
}

impl<S> Source for GainStage<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        self.source.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_round_trips_values() {
        let gain = GainControl::new(0.7);
        assert_eq!(gain.get(), 0.7);
        gain.set(0.25);
        assert_eq!(gain.get(), 0.25);
    }

    #[test]
    fn negative_gain_clamps_to_zero() {
        let gain = GainControl::new(1.0);
        gain.set(-0.5);
        assert_eq!(gain.get(), 0.0);
    }

    #[test]
    fn clones_share_the_same_scalar() {
        let a = GainControl::new(1.0);
        let b = a.clone();
        b.set(0.4);
        assert_eq!(a.get(), 0.4);
    }
}
