// src/lib.rs
//! Prism - a terminal music player with a real-time audio visualizer.
//!
//! Playback routes through an analysis tap and gain stage; the visualizer
//! engine samples the live signal every frame and draws one of eleven
//! styles onto a software canvas shown in the TUI.

pub mod app;
pub mod audio;
pub mod config;
pub mod fs;
pub mod host;
pub mod render;
pub mod ui;
pub mod viz;
