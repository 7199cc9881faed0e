// src/audio/mod.rs
//! Audio module - playback, the routing graph, and signal analysis.

pub mod analyser;
pub mod capture;
pub mod gain;
pub mod graph;
pub mod player;
pub mod volume;

// Re-export commonly used types
pub use analyser::Analyser;
pub use capture::{AnalysisTap, TapEvent};
pub use gain::{GainControl, GainStage};
pub use graph::{AudioGraphError, ConnectPolicy, RoutingGraph, TapHandles};
pub use player::MusicPlayer;
pub use volume::VolumeSync;
