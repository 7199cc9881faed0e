// src/host.rs
//! The seam between the visualizer core and whatever hosts the media.
//!
//! The host owns the playable media, the volume control, and the next-track
//! control; the routing graph only talks to it through this trait. The TUI
//! application implements it over the playback engine, and tests implement
//! it with scripted fakes.

use crate::audio::graph::{AudioGraphError, TapHandles};

pub trait MediaHost: Send + Sync {
    /// Whether a playable media source exists yet. May be false early in
    /// the host's life; the routing graph polls until it turns true.
    fn media_present(&self) -> bool;

    /// Install the analysis/gain tap into the playback chain.
    ///
    /// A host's media may be wrapped into a routing graph at most once;
    /// a second attempt fails with `AlreadyWrapped`.
    fn install_tap(&self, handles: TapHandles) -> Result<(), AudioGraphError>;

    /// Whether the audio output is up and running (as opposed to suspended
    /// or not yet created).
    fn output_running(&self) -> bool;

    /// Ask the host to resume a suspended output. Best-effort.
    fn resume_output(&self);

    /// Current reading of the host's volume control, 0..=100.
    fn volume_percent(&self) -> Option<u8>;

    /// Activate the host's "next track" control.
    fn advance_track(&self);

    /// Ask the host to start playback of the current media. May fail
    /// transiently while the next track is still loading.
    fn begin_playback(&self) -> Result<(), AudioGraphError>;

    /// Whether playback is currently stalled (paused or not started).
    fn playback_stalled(&self) -> bool;

    /// One-shot notification that high-quality audio routing is active.
    /// Hosts without a use for it can ignore it; this is best-effort.
    fn notify_audio_ready(&self) {}
}
