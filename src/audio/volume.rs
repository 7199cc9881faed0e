// src/audio/volume.rs
//! Mirrors the host's volume and mute controls onto the graph's gain stage.
//!
//! Once the tap is installed the host's own output no longer carries the
//! signal, so its volume slider must be replayed onto the gain scalar or the
//! controls would go dead.

use tracing::debug;

use super::gain::GainControl;

pub struct VolumeSync {
    gain: GainControl,
    /// Gain implied by the slider position, remembered across mute.
    slider_gain: f32,
    muted: bool,
}

impl VolumeSync {
    pub fn new(gain: GainControl) -> Self {
        let slider_gain = gain.get();
        Self {
            gain,
            slider_gain,
            muted: false,
        }
    }

    /// The host's volume slider moved. Percent is 0..=100.
    pub fn on_volume_changed(&mut self, percent: u8) {
        self.slider_gain = percent.min(100) as f32 / 100.0;
        if !self.muted {
            self.gain.set(self.slider_gain);
        }
        debug!(percent, muted = self.muted, "volume mirrored to gain stage");
    }

    /// The host's mute toggled. Muting zeroes the gain; unmuting restores
    /// the last slider position.
    pub fn on_mute_changed(&mut self, muted: bool) {
        self.muted = muted;
        self.gain
            .set(if muted { 0.0 } else { self.slider_gain });
        debug!(muted, "mute mirrored to gain stage");
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_moves_write_through() {
        let gain = GainControl::new(0.7);
        let mut sync = VolumeSync::new(gain.clone());
        sync.on_volume_changed(25);
        assert_eq!(gain.get(), 0.25);
        sync.on_volume_changed(100);
        assert_eq!(gain.get(), 1.0);
    }

    #[test]
    fn mute_zeroes_and_unmute_restores() {
        let gain = GainControl::new(0.7);
        let mut sync = VolumeSync::new(gain.clone());
        sync.on_volume_changed(60);
        sync.on_mute_changed(true);
        assert_eq!(gain.get(), 0.0);
        sync.on_mute_changed(false);
        assert_eq!(gain.get(), 0.6);
    }

    #[test]
    fn slider_moves_while_muted_stay_silent_until_unmute() {
        let gain = GainControl::new(0.7);
        let mut sync = VolumeSync::new(gain.clone());
        sync.on_mute_changed(true);
        sync.on_volume_changed(90);
        assert_eq!(gain.get(), 0.0);
        sync.on_mute_changed(false);
        assert_eq!(gain.get(), 0.9);
    }

    #[test]
    fn out_of_range_percent_clamps() {
        let gain = GainControl::new(0.7);
        let mut sync = VolumeSync::new(gain.clone());
        sync.on_volume_changed(250);
        assert_eq!(gain.get(), 1.0);
    }
}
