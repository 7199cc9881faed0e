// src/audio/graph.rs
//! The audio routing graph: source -> analysis tap -> gain -> output.
//!
//! Built exactly once per media source and kept alive for the life of the
//! process. Stopping the visualizer only pauses rendering; the graph stays
//! connected so restarts never click or pop.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use ringbuf::HeapRb;
use ringbuf::traits::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::host::MediaHost;

use super::capture::TapEvent;
use super::gain::GainControl;

/// Capacity of the shared sample ring, comfortably more than one analysis
/// window at any rate rodio decodes at.
const RING_CAPACITY: usize = 4096;

/// Gain applied when the host's volume control cannot be read.
const FALLBACK_GAIN: f32 = 0.7;

/// Errors raised while acquiring or driving the audio routing graph.
#[derive(Debug, Error)]
pub enum AudioGraphError {
    #[error("media source never appeared")]
    MediaUnavailable,
    #[error("media source is already wrapped into a routing graph")]
    AlreadyWrapped,
    #[error("audio output failure: {0}")]
    Output(String),
    #[error("playback did not start")]
    PlaybackStalled,
}

/// Shared handles the host wires into its playback chain when the tap is
/// installed: the capture ring the analyser reads, the gain scalar, and the
/// channel end-of-stream events arrive on.
pub struct TapHandles {
    pub capture: Arc<Mutex<HeapRb<f32>>>,
    pub gain: GainControl,
    pub events: Sender<TapEvent>,
}

/// Retry and timing policy for graph acquisition. The defaults mirror the
/// tuned production values; tests shrink every interval to zero.
#[derive(Debug, Clone)]
pub struct ConnectPolicy {
    /// Delay between polls for the media source's existence.
    pub poll_interval: Duration,
    /// Optional cap on media polls. `None` polls forever.
    pub max_polls: Option<u32>,
    /// Delay between checks for the output reaching its running state.
    pub resume_interval: Duration,
    /// Cap on running-state checks; exceeded caps log and proceed degraded
    /// so the loading overlay can never hang on a wedged output.
    pub max_resume_polls: u32,
    /// Hold after the output reports running, because real audio hardware
    /// startup can lag the state flag.
    pub stabilization: Duration,
    /// Delay between auto-advance playback attempts.
    pub advance_backoff: Duration,
    /// Bounded number of auto-advance playback attempts.
    pub advance_retries: u32,
}

impl Default for ConnectPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
            max_polls: None,
            resume_interval: Duration::from_millis(200),
            max_resume_polls: 50,
            stabilization: Duration::from_millis(500),
            advance_backoff: Duration::from_millis(300),
            advance_retries: 3,
        }
    }
}

/// Graph acquisition state. `Connecting` is entered at most once at a time;
/// `Connected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    Unconnected,
    Connecting,
    Connected,
}

/// Outcome of a `connect` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// This call performed the connection.
    Connected,
    /// A previous call already connected; nothing was done.
    AlreadyConnected,
    /// Another caller is connecting right now; nothing was done.
    InFlight,
}

pub struct RoutingGraph {
    state: Mutex<GraphState>,
    capture: Arc<Mutex<HeapRb<f32>>>,
    gain: GainControl,
    events_tx: Sender<TapEvent>,
    events_rx: Mutex<Receiver<TapEvent>>,
}

impl RoutingGraph {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            state: Mutex::new(GraphState::Unconnected),
            capture: Arc::new(Mutex::new(HeapRb::new(RING_CAPACITY))),
            gain: GainControl::new(FALLBACK_GAIN),
            events_tx,
            events_rx: Mutex::new(events_rx),
        }
    }

    /// Handle to the capture ring the analyser reads from.
    pub fn capture_buffer(&self) -> Arc<Mutex<HeapRb<f32>>> {
        self.capture.clone()
    }

    /// Handle to the graph's gain scalar.
    pub fn gain(&self) -> GainControl {
        self.gain.clone()
    }

    pub fn state(&self) -> GraphState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(GraphState::Unconnected)
    }

    pub fn is_connected(&self) -> bool {
        self.state() == GraphState::Connected
    }

    /// Acquire the media source and wire up the graph.
    ///
    /// Idempotent: once connected, later calls return `AlreadyConnected`
    /// immediately without re-wrapping anything. Construction errors leave
    /// the graph unconnected so an explicit retry can succeed later.
    pub fn connect(
        &self,
        host: &dyn MediaHost,
        policy: &ConnectPolicy,
    ) -> Result<ConnectOutcome, AudioGraphError> {
        {
            let Ok(mut state) = self.state.lock() else {
                return Err(AudioGraphError::Output("graph state poisoned".into()));
            };
            match *state {
                GraphState::Connected => return Ok(ConnectOutcome::AlreadyConnected),
                GraphState::Connecting => return Ok(ConnectOutcome::InFlight),
                GraphState::Unconnected => *state = GraphState::Connecting,
            }
        }

        let result = self.connect_inner(host, policy);
        if let Ok(mut state) = self.state.lock() {
            *state = if result.is_ok() {
                GraphState::Connected
            } else {
                GraphState::Unconnected
            };
        }
        result.map(|()| ConnectOutcome::Connected)
    }

    fn connect_inner(
        &self,
        host: &dyn MediaHost,
        policy: &ConnectPolicy,
    ) -> Result<(), AudioGraphError> {
        // The media source may not exist yet while the host is still
        // loading; poll until it shows up.
        let mut polls = 0u32;
        while !host.media_present() {
            polls += 1;
            if let Some(max) = policy.max_polls {
                if polls >= max {
                    warn!(polls, "media source never appeared, giving up");
                    return Err(AudioGraphError::MediaUnavailable);
                }
            }
            thread::sleep(policy.poll_interval);
        }
        debug!(polls, "media source found");

        // Default the gain stage to the host's current volume reading so
        // inserting the tap does not change perceived loudness.
        let gain = host
            .volume_percent()
            .map(|p| p.min(100) as f32 / 100.0)
            .unwrap_or(FALLBACK_GAIN);
        self.gain.set(gain);

        host.install_tap(TapHandles {
            capture: self.capture.clone(),
            gain: self.gain.clone(),
            events: self.events_tx.clone(),
        })?;
        info!(gain, "audio routing established");

        // Wait for the output to actually run, resuming it if suspended.
        let mut resume_polls = 0u32;
        while !host.output_running() {
            host.resume_output();
            resume_polls += 1;
            if resume_polls >= policy.max_resume_polls {
                warn!("output never reported running, proceeding degraded");
                break;
            }
            thread::sleep(policy.resume_interval);
        }

        // Hardware/driver startup can lag the running flag.
        thread::sleep(policy.stabilization);
        host.notify_audio_ready();
        Ok(())
    }

    /// Drain one pending end-of-stream event, if any.
    pub fn take_ended_event(&self) -> bool {
        self.events_rx
            .lock()
            .map(|rx| rx.try_recv() == Ok(TapEvent::Ended))
            .unwrap_or(false)
    }

    /// Reimplementation of the host's native auto-advance, which taking over
    /// the audio routing disables: activate the next-track control, then
    /// nudge playback a bounded number of times in case the new track is not
    /// immediately ready. Self-terminating; never panics on failure.
    pub fn auto_advance(&self, host: &dyn MediaHost, policy: &ConnectPolicy) {
        info!("track ended, auto-advancing");
        host.advance_track();

        for attempt in 1..=policy.advance_retries {
            thread::sleep(policy.advance_backoff);
            if !host.playback_stalled() {
                debug!(attempt, "playback resumed on its own");
                return;
            }
            match host.begin_playback() {
                Ok(()) => {
                    debug!(attempt, "playback started");
                    return;
                }
                Err(err) => debug!(attempt, %err, "auto-advance playback attempt failed"),
            }
        }
        warn!(
            retries = policy.advance_retries,
            "auto-advance abandoned, playback stays paused"
        );
    }
}

impl Default for RoutingGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use super::*;

    /// Scripted host: media appears after a fixed number of polls, playback
    /// attempts fail a fixed number of times.
    struct ScriptedHost {
        appear_after: u32,
        polls: AtomicU32,
        installs: AtomicU32,
        running: AtomicBool,
        stalled: AtomicBool,
        advances: AtomicU32,
        play_calls: AtomicU32,
        play_failures: u32,
        ready_notices: AtomicU32,
    }

    impl ScriptedHost {
        fn new(appear_after: u32) -> Self {
            Self {
                appear_after,
                polls: AtomicU32::new(0),
                installs: AtomicU32::new(0),
                running: AtomicBool::new(true),
                stalled: AtomicBool::new(false),
                advances: AtomicU32::new(0),
                play_calls: AtomicU32::new(0),
                play_failures: 0,
                ready_notices: AtomicU32::new(0),
            }
        }
    }

    impl MediaHost for ScriptedHost {
        fn media_present(&self) -> bool {
            self.polls.fetch_add(1, Ordering::SeqCst) >= self.appear_after
        }

        fn install_tap(&self, _handles: TapHandles) -> Result<(), AudioGraphError> {
            if self.installs.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(AudioGraphError::AlreadyWrapped);
            }
            Ok(())
        }

        fn output_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }

        fn resume_output(&self) {
            self.running.store(true, Ordering::SeqCst);
        }

        fn volume_percent(&self) -> Option<u8> {
            Some(80)
        }

        fn advance_track(&self) {
            self.advances.fetch_add(1, Ordering::SeqCst);
        }

        fn begin_playback(&self) -> Result<(), AudioGraphError> {
            let call = self.play_calls.fetch_add(1, Ordering::SeqCst);
            if call < self.play_failures {
                Err(AudioGraphError::PlaybackStalled)
            } else {
                self.stalled.store(false, Ordering::SeqCst);
                Ok(())
            }
        }

        fn playback_stalled(&self) -> bool {
            self.stalled.load(Ordering::SeqCst)
        }

        fn notify_audio_ready(&self) {
            self.ready_notices.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fast_policy() -> ConnectPolicy {
        ConnectPolicy {
            poll_interval: Duration::ZERO,
            max_polls: Some(100),
            resume_interval: Duration::ZERO,
            max_resume_polls: 5,
            stabilization: Duration::ZERO,
            advance_backoff: Duration::ZERO,
            advance_retries: 3,
        }
    }

    #[test]
    fn connects_after_media_appears() {
        let graph = RoutingGraph::new();
        let host = ScriptedHost::new(3);
        let outcome = graph.connect(&host, &fast_policy()).unwrap();
        assert_eq!(outcome, ConnectOutcome::Connected);
        assert!(graph.is_connected());
        assert_eq!(host.installs.load(Ordering::SeqCst), 1);
        assert_eq!(host.ready_notices.load(Ordering::SeqCst), 1);
        // The gain stage picked up the host's volume reading.
        assert_eq!(graph.gain().get(), 0.8);
    }

    #[test]
    fn connect_is_idempotent_and_wraps_once() {
        let graph = RoutingGraph::new();
        let host = ScriptedHost::new(0);
        assert_eq!(
            graph.connect(&host, &fast_policy()).unwrap(),
            ConnectOutcome::Connected
        );
        assert_eq!(
            graph.connect(&host, &fast_policy()).unwrap(),
            ConnectOutcome::AlreadyConnected
        );
        assert_eq!(
            graph.connect(&host, &fast_policy()).unwrap(),
            ConnectOutcome::AlreadyConnected
        );
        assert_eq!(host.installs.load(Ordering::SeqCst), 1);
        assert_eq!(host.ready_notices.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_acquisition_leaves_graph_retryable() {
        let graph = RoutingGraph::new();
        let host = ScriptedHost::new(u32::MAX);
        let err = graph.connect(&host, &fast_policy()).unwrap_err();
        assert!(matches!(err, AudioGraphError::MediaUnavailable));
        assert_eq!(graph.state(), GraphState::Unconnected);

        // A later attempt against a present media source succeeds.
        let host = ScriptedHost::new(0);
        assert_eq!(
            graph.connect(&host, &fast_policy()).unwrap(),
            ConnectOutcome::Connected
        );
    }

    #[test]
    fn auto_advance_exhausts_after_three_attempts() {
        let graph = RoutingGraph::new();
        let mut host = ScriptedHost::new(0);
        host.play_failures = u32::MAX;
        host.stalled.store(true, Ordering::SeqCst);

        graph.auto_advance(&host, &fast_policy());

        assert_eq!(host.advances.load(Ordering::SeqCst), 1);
        assert_eq!(host.play_calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn auto_advance_stops_once_playback_starts() {
        let graph = RoutingGraph::new();
        let mut host = ScriptedHost::new(0);
        host.play_failures = 1;
        host.stalled.store(true, Ordering::SeqCst);

        graph.auto_advance(&host, &fast_policy());

        // First attempt failed, second succeeded, no third.
        assert_eq!(host.play_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn ended_events_drain_one_at_a_time() {
        let graph = RoutingGraph::new();
        assert!(!graph.take_ended_event());
        graph.events_tx.send(TapEvent::Ended).unwrap();
        assert!(graph.take_ended_event());
        assert!(!graph.take_ended_event());
    }
}
