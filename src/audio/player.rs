// src/audio/player.rs
//! Music playback engine using rodio, hosting the analysis/gain tap.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use ringbuf::traits::*;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::{debug, warn};

use crate::audio::capture::AnalysisTap;
use crate::audio::gain::GainStage;
use crate::audio::graph::{AudioGraphError, TapHandles};
use crate::host::MediaHost;

/// Commands sent to the audio playback thread.
enum PlayerCommand {
    Play(PathBuf),
    Pause,
    Resume,
    Stop,
}

/// Player that can `play()`, `pause()`, `resume()`, or `stop()` a file,
/// stopping any prior playback. Playback runs on a dedicated thread that
/// owns the output stream; this handle only sends commands and mirrors
/// state flags.
///
/// Doubles as the `MediaHost` the routing graph connects to: once a tap is
/// installed, every track's decode chain is routed through the analysis
/// capture and gain stage before reaching the sink.
pub struct MusicPlayer {
    /// Sender to the audio thread for commands. Mutex so commands can be
    /// sent through a shared reference.
    cmd_tx: Mutex<Sender<PlayerCommand>>,
    /// Local flags mirrored from the audio thread for quick UI access
    is_playing_flag: Arc<AtomicBool>,
    is_paused_flag: Arc<AtomicBool>,
    /// Whether the audio thread managed to open an output stream.
    output_alive: Arc<AtomicBool>,
    /// UI-facing volume slider position, 0..=100.
    volume: AtomicU8,
    /// Set by `advance_track`; the UI loop drains it and plays the next entry.
    advance_requested: AtomicBool,
    /// Tap handles installed by the routing graph, wired into the decode
    /// chain of every subsequent track. Written at most once.
    tap: Arc<Mutex<Option<TapHandles>>>,
}

impl MusicPlayer {
    /// Create an idle player.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCommand>();

        let is_playing_flag = Arc::new(AtomicBool::new(false));
        let is_paused_flag = Arc::new(AtomicBool::new(false));
        let output_alive = Arc::new(AtomicBool::new(false));
        let tap: Arc<Mutex<Option<TapHandles>>> = Arc::new(Mutex::new(None));

        let playing = is_playing_flag.clone();
        let paused = is_paused_flag.clone();
        let alive = output_alive.clone();
        let tap_slot = tap.clone();

        // The audio thread owns the OutputStream and handles play/pause/stop.
        thread::spawn(move || {
            let Ok((stream, handle)) = OutputStream::try_default() else {
                warn!("no audio output available, draining commands");
                while rx.recv().is_ok() {}
                return;
            };
            alive.store(true, Ordering::SeqCst);

            let mut sink: Option<Sink> = None;
            while let Ok(cmd) = rx.recv() {
                match cmd {
                    PlayerCommand::Play(path) => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        let Ok(new_sink) = Sink::try_new(&handle) else {
                            continue;
                        };
                        let Ok(file) = File::open(&path) else {
                            warn!(path = %path.display(), "could not open track");
                            continue;
                        };
                        let Ok(source) = Decoder::new(BufReader::new(file)) else {
                            warn!(path = %path.display(), "could not decode track");
                            continue;
                        };
                        let converted = source.convert_samples::<f32>();

                        // Route through the tap when one is installed, so
                        // analysis sees the signal and the gain stage owns
                        // loudness. Untapped playback goes straight through.
                        let tapped = tap_slot.lock().ok().and_then(|slot| {
                            slot.as_ref().map(|handles| {
                                if let Ok(mut buf) = handles.capture.lock() {
                                    buf.clear();
                                }
                                (
                                    handles.capture.clone(),
                                    handles.gain.clone(),
                                    handles.events.clone(),
                                )
                            })
                        });
                        match tapped {
                            Some((capture, gain, events)) => {
                                let chain = GainStage::new(
                                    AnalysisTap::new(converted, capture, events),
                                    gain,
                                );
                                new_sink.append(chain);
                            }
                            None => new_sink.append(converted),
                        }

                        new_sink.play();
                        playing.store(true, Ordering::SeqCst);
                        paused.store(false, Ordering::SeqCst);
                        sink = Some(new_sink);
                    }
                    PlayerCommand::Pause => {
                        if let Some(s) = &sink {
                            s.pause();
                            paused.store(true, Ordering::SeqCst);
                        }
                    }
                    PlayerCommand::Resume => {
                        if let Some(s) = &sink {
                            s.play();
                            paused.store(false, Ordering::SeqCst);
                        }
                    }
                    PlayerCommand::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        playing.store(false, Ordering::SeqCst);
                        paused.store(false, Ordering::SeqCst);
                    }
                }
            }
            if let Some(s) = sink.take() {
                s.stop();
            }
            drop(stream);
        });

        Self {
            cmd_tx: Mutex::new(tx),
            is_playing_flag,
            is_paused_flag,
            output_alive,
            volume: AtomicU8::new(70),
            advance_requested: AtomicBool::new(false),
            tap,
        }
    }

    fn send(&self, cmd: PlayerCommand) {
        if let Ok(tx) = self.cmd_tx.lock() {
            let _ = tx.send(cmd);
        }
    }

    /// Stop any existing playback and start playing `path`.
    pub fn play(&self, path: &PathBuf) -> Result<()> {
        self.send(PlayerCommand::Play(path.clone()));
        Ok(())
    }

    /// Pause playback if currently playing.
    pub fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    /// Resume playback if currently paused.
    pub fn resume(&self) {
        self.send(PlayerCommand::Resume);
    }

    /// Immediately halt playback (if any).
    pub fn stop(&self) {
        self.send(PlayerCommand::Stop);
    }

    /// Returns true if there's an active sink (i.e. playing or paused).
    pub fn is_playing(&self) -> bool {
        self.is_playing_flag.load(Ordering::SeqCst)
    }

    /// Returns true if playback is currently paused.
    pub fn is_paused(&self) -> bool {
        self.is_paused_flag.load(Ordering::SeqCst)
    }

    /// Record the UI's volume slider position, 0..=100. The gain stage is
    /// driven separately by the volume synchronizer; this value seeds the
    /// graph's initial gain and feeds the player panel.
    pub fn set_volume_percent(&self, percent: u8) {
        self.volume.store(percent.min(100), Ordering::SeqCst);
    }

    /// Drain a pending next-track request raised by auto-advance.
    pub fn take_advance_request(&self) -> bool {
        self.advance_requested.swap(false, Ordering::SeqCst)
    }
}

impl Default for MusicPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaHost for MusicPlayer {
    /// The playback engine is the media source and lives as long as the
    /// player, so the tap can be installed before the first track is
    /// queued. Every decode chain built afterwards routes through it.
    fn media_present(&self) -> bool {
        true
    }

    fn install_tap(&self, handles: TapHandles) -> Result<(), AudioGraphError> {
        let Ok(mut slot) = self.tap.lock() else {
            return Err(AudioGraphError::Output("tap slot poisoned".into()));
        };
        if slot.is_some() {
            return Err(AudioGraphError::AlreadyWrapped);
        }
        *slot = Some(handles);
        debug!("analysis tap installed into playback chain");
        Ok(())
    }

    fn output_running(&self) -> bool {
        self.output_alive.load(Ordering::SeqCst)
    }

    fn resume_output(&self) {
        // The rodio output stream has no suspended state to leave; resuming
        // a paused sink is the closest equivalent.
        if self.is_paused() {
            self.resume();
        }
    }

    fn volume_percent(&self) -> Option<u8> {
        Some(self.volume.load(Ordering::SeqCst))
    }

    fn advance_track(&self) {
        self.advance_requested.store(true, Ordering::SeqCst);
    }

    fn begin_playback(&self) -> Result<(), AudioGraphError> {
        if !self.is_playing() {
            return Err(AudioGraphError::PlaybackStalled);
        }
        if self.is_paused() {
            self.resume();
        }
        Ok(())
    }

    fn playback_stalled(&self) -> bool {
        !self.is_playing() || self.is_paused()
    }
}

#[cfg(test)]
mod tests {
    use ringbuf::HeapRb;

    use crate::audio::gain::GainControl;

    use super::*;

    fn test_handles() -> TapHandles {
        let (tx, _rx) = mpsc::channel();
        TapHandles {
            capture: Arc::new(Mutex::new(HeapRb::new(64))),
            gain: GainControl::new(1.0),
            events: tx,
        }
    }

    #[test]
    fn media_is_present_before_any_track_is_queued() {
        let player = MusicPlayer::new();
        // The routing graph must be able to connect at startup, before the
        // first play command ever arrives.
        assert!(player.media_present());
    }

    #[test]
    fn tap_installs_exactly_once() {
        let player = MusicPlayer::new();
        assert!(player.install_tap(test_handles()).is_ok());
        assert!(matches!(
            player.install_tap(test_handles()),
            Err(AudioGraphError::AlreadyWrapped)
        ));
    }

    #[test]
    fn begin_playback_reports_stall_while_idle() {
        let player = MusicPlayer::new();
        assert!(player.playback_stalled());
        assert!(matches!(
            player.begin_playback(),
            Err(AudioGraphError::PlaybackStalled)
        ));
    }
}
