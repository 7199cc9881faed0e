// src/render/mod.rs
//! Render module - drawing surface, colors, palettes, and style dispatch.

pub mod canvas;
pub mod color;
pub mod palette;
mod styles;

pub use canvas::Canvas;
pub use color::Rgb;
pub use palette::Palette;

use crate::viz::settings::{Style, VisualizerSettings};

/// Draw one frame of the active style.
///
/// Always begins by filling the whole surface with the background color.
/// Glow is pushed around the style call and cleared immediately after so it
/// never leaks into the next frame.
pub fn dispatch(
    canvas: &mut Canvas,
    settings: &VisualizerSettings,
    freq: &[u8],
    time: &[u8],
    clock: f32,
) {
    canvas.fill(settings.background_color);
    if settings.glow_enabled {
        canvas.set_glow(settings.glow_intensity);
    }
    match settings.style {
        Style::Bars => styles::bars(canvas, settings, freq),
        Style::Wave => styles::wave(canvas, settings, time),
        Style::Circular => styles::circular(canvas, settings, freq),
        Style::Radial => styles::radial(canvas, settings, freq),
        Style::Spectrum => styles::spectrum(canvas, settings, freq),
        Style::Particles => styles::particles(canvas, settings, freq, clock),
        Style::Symmetrical => styles::symmetrical(canvas, settings, freq),
        Style::Spiral => styles::spiral(canvas, settings, freq, clock),
        Style::Blob => styles::blob(canvas, settings, freq, clock),
        Style::Line => styles::line(canvas, settings, freq),
        Style::Dual => styles::dual(canvas, settings, time),
    }
    canvas.clear_glow();
}
