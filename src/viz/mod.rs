// src/viz/mod.rs
//! Visualizer module - engine lifecycle, frame sampling, and settings.

pub mod engine;
pub mod sampler;
pub mod settings;

pub use engine::{EngineOptions, Lifecycle, Visualizer};
pub use sampler::FrameSampler;
pub use settings::{SettingsUpdate, Style, VisualizerSettings};
