// src/viz/engine.rs
//! The visualizer engine: lifecycle, frame loop, and the loading overlay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::graph::{ConnectOutcome, ConnectPolicy, GraphState, RoutingGraph};
use crate::host::MediaHost;
use crate::render::{self, Canvas};
use crate::viz::sampler::FrameSampler;
use crate::viz::settings::{SettingsUpdate, Style, VisualizerSettings};

/// Engine lifecycle, derived rather than stored: the routing graph state and
/// the rendering flag together determine it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No graph yet and nothing in flight.
    Uninitialized,
    /// Graph acquisition is running.
    Connecting,
    /// Graph is live but frames are not being drawn.
    Idle,
    /// Frames are being drawn.
    Rendering,
}

/// Construction options. Defaults match production behavior; tests shrink
/// the delays and skip the background connect.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Kick off graph acquisition on a background thread at bootstrap.
    pub connect_on_bootstrap: bool,
    /// Grace period before the bootstrap connect starts, letting the host
    /// finish its own startup first.
    pub startup_delay: Duration,
    /// Minimum time the loading overlay stays visible once shown, so it
    /// never flashes.
    pub overlay_min: Duration,
    pub policy: ConnectPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            connect_on_bootstrap: true,
            startup_delay: Duration::from_millis(100),
            overlay_min: Duration::from_secs(2),
            policy: ConnectPolicy::default(),
        }
    }
}

pub struct Visualizer {
    host: Arc<dyn MediaHost>,
    graph: Arc<RoutingGraph>,
    policy: ConnectPolicy,
    sampler: FrameSampler,
    settings: VisualizerSettings,
    canvas: Option<Canvas>,
    rendering: bool,
    /// Animation clock in seconds, advanced by animation_speed.
    clock: f32,
    last_frame: Option<Instant>,
    /// When the loading overlay first became visible.
    overlay_shown_at: Option<Instant>,
    overlay_min: Duration,
    bootstrap_done: Arc<AtomicBool>,
}

impl Visualizer {
    pub fn new(host: Arc<dyn MediaHost>, options: EngineOptions) -> Self {
        let graph = Arc::new(RoutingGraph::new());
        let sampler = FrameSampler::new(graph.capture_buffer());
        let mut engine = Self {
            host,
            graph,
            policy: options.policy.clone(),
            sampler,
            settings: VisualizerSettings::default(),
            canvas: None,
            rendering: false,
            clock: 0.0,
            last_frame: None,
            overlay_shown_at: None,
            overlay_min: options.overlay_min,
            bootstrap_done: Arc::new(AtomicBool::new(false)),
        };
        if options.connect_on_bootstrap {
            engine.bootstrap(options.startup_delay);
        } else {
            engine.bootstrap_done.store(true, Ordering::SeqCst);
        }
        engine
    }

    /// Begin graph acquisition on a background thread and show the loading
    /// overlay. Rendering does not wait for this; `start` joins in on the
    /// same graph via the connect state machine.
    fn bootstrap(&mut self, startup_delay: Duration) {
        self.overlay_shown_at = Some(Instant::now());
        let host = self.host.clone();
        let graph = self.graph.clone();
        let policy = self.policy.clone();
        let done = self.bootstrap_done.clone();
        thread::spawn(move || {
            thread::sleep(startup_delay);
            match graph.connect(host.as_ref(), &policy) {
                Ok(outcome) => debug!(?outcome, "bootstrap connect finished"),
                Err(err) => warn!(%err, "bootstrap connect failed"),
            }
            done.store(true, Ordering::SeqCst);
        });
    }

    /// Whether the loading overlay should be drawn. Visible from bootstrap
    /// until the connect attempt settles, but never for less than the
    /// configured minimum so it cannot flash.
    pub fn overlay_visible(&self) -> bool {
        let Some(shown_at) = self.overlay_shown_at else {
            return false;
        };
        !self.bootstrap_done.load(Ordering::SeqCst) || shown_at.elapsed() < self.overlay_min
    }

    /// Give the engine its drawing surface, or resize the existing one.
    pub fn set_canvas(&mut self, width: usize, height: usize) {
        match &mut self.canvas {
            Some(canvas) if canvas.width() == width && canvas.height() == height => {}
            Some(canvas) => canvas.resize(width, height),
            None => self.canvas = Some(Canvas::new(width, height)),
        }
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Start rendering. Connects the routing graph first if nothing else
    /// has; a connect already in flight leaves rendering off, and the caller
    /// retries on the next visibility change.
    pub fn start(&mut self) {
        if self.rendering {
            return;
        }
        if self.canvas.is_none() {
            warn!("start requested without a drawing surface");
            return;
        }
        if !self.graph.is_connected() {
            match self.graph.connect(self.host.as_ref(), &self.policy) {
                Ok(ConnectOutcome::InFlight) => {
                    debug!("connect already in flight, not rendering yet");
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "could not connect routing graph");
                    return;
                }
            }
        }
        self.host.resume_output();
        self.rendering = true;
        self.last_frame = None;
        info!(style = self.settings.style.as_str(), "visualizer started");
    }

    /// Stop rendering and blank the surface. Idempotent; the routing graph
    /// stays connected for the next start.
    pub fn stop(&mut self) {
        if !self.rendering {
            return;
        }
        self.rendering = false;
        self.last_frame = None;
        if let Some(canvas) = &mut self.canvas {
            canvas.fill(self.settings.background_color);
        }
        info!("visualizer stopped");
    }

    pub fn is_active(&self) -> bool {
        self.rendering
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.rendering {
            return Lifecycle::Rendering;
        }
        match self.graph.state() {
            GraphState::Connected => Lifecycle::Idle,
            GraphState::Connecting => Lifecycle::Connecting,
            GraphState::Unconnected => Lifecycle::Uninitialized,
        }
    }

    /// Draw one frame. No-op while stopped. A frame without a full analysis
    /// window is skipped, leaving the previous image on the surface.
    pub fn on_frame(&mut self) {
        if !self.rendering {
            return;
        }
        self.process_events();

        let now = Instant::now();
        if let Some(last) = self.last_frame {
            self.clock += now.duration_since(last).as_secs_f32() * self.settings.animation_speed;
        }
        self.last_frame = Some(now);

        if !self.sampler.refresh() {
            return;
        }
        if matches!(self.settings.style, Style::Wave | Style::Dual) {
            self.sampler.refresh_time_domain();
        }
        if let Some(canvas) = &mut self.canvas {
            render::dispatch(
                canvas,
                &self.settings,
                self.sampler.frequency(),
                self.sampler.time_domain(),
                self.clock,
            );
        }
    }

    /// React to end-of-stream from the tap by auto-advancing off the frame
    /// loop; the bounded retry sleeps must not stall drawing.
    fn process_events(&mut self) {
        if self.graph.take_ended_event() {
            let host = self.host.clone();
            let graph = self.graph.clone();
            let policy = self.policy.clone();
            thread::spawn(move || graph.auto_advance(host.as_ref(), &policy));
        }
    }

    /// Merge a partial settings update; numeric fields clamp to range.
    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.settings.apply(update);
    }

    pub fn reset_to_defaults(&mut self) {
        self.settings = VisualizerSettings::default();
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> VisualizerSettings {
        self.settings.clone()
    }

    pub fn graph(&self) -> &Arc<RoutingGraph> {
        &self.graph
    }
}
