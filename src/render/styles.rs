// src/render/styles.rs
//! The eleven visualization styles.
//!
//! Every function draws exactly one frame onto an already background-filled
//! canvas. Magnitudes arrive as bytes (0..255), are normalized and scaled by
//! the sensitivity setting, and colors resolve through the active palette by
//! position. Empty sample slices return early without drawing.

use std::f32::consts::TAU;

use crate::viz::settings::VisualizerSettings;

use super::canvas::Canvas;

/// Palette position denominator guarding against single-element slices.
fn position_denom(len: usize) -> f32 {
    len.saturating_sub(1).max(1) as f32
}

/// Vertical bars across the full width, height proportional to magnitude.
pub(crate) fn bars(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8]) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let bar_width = (w / freq.len() as f32) * 2.5;
    let denom = position_denom(freq.len());

    let mut x = 0.0;
    for (i, &v) in freq.iter().enumerate() {
        if x > w {
            break;
        }
        let bar_height = v as f32 / 255.0 * h * s.sensitivity;
        let color = s.color_at(i as f32 / denom);
        canvas.fill_rect_vgradient(
            x,
            h - bar_height,
            bar_width,
            bar_height,
            &[(0.0, color), (1.0, color.adjust(-40))],
        );
        x += bar_width + s.bar_spacing;
    }
}

/// Same geometry as bars but with a three-stop dark/color/light gradient.
pub(crate) fn spectrum(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8]) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let bar_width = w / freq.len() as f32;
    let denom = position_denom(freq.len());

    for (i, &v) in freq.iter().enumerate() {
        let bar_height = v as f32 / 255.0 * h * s.sensitivity;
        let x = i as f32 * bar_width;
        let y = h - bar_height;
        let color = s.color_at(i as f32 / denom);
        canvas.fill_rect_vgradient(
            x,
            y,
            (bar_width - s.bar_spacing).max(1.0),
            bar_height,
            &[
                (0.0, color.adjust(60)),
                (0.5, color),
                (1.0, color.adjust(-60)),
            ],
        );
    }
}

/// Bars mirrored above and below the horizontal centerline.
pub(crate) fn symmetrical(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8]) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_y = h / 2.0;
    let bar_width = w / freq.len() as f32;
    let denom = position_denom(freq.len());

    for (i, &v) in freq.iter().enumerate() {
        let bar_height = v as f32 / 255.0 * (h / 2.0) * s.sensitivity;
        let x = i as f32 * bar_width;
        let draw_width = (bar_width - s.bar_spacing).max(1.0);
        let color = s.color_at(i as f32 / denom);

        // Top half fades darker away from the centerline.
        canvas.fill_rect_vgradient(
            x,
            center_y - bar_height,
            draw_width,
            bar_height,
            &[(0.0, color.adjust(-40)), (1.0, color)],
        );
        // Bottom half, mirrored.
        canvas.fill_rect_vgradient(
            x,
            center_y,
            draw_width,
            bar_height,
            &[(0.0, color), (1.0, color.adjust(-40))],
        );
    }
}

/// Polyline of per-bin magnitudes with a gradient-filled area beneath.
pub(crate) fn line(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8]) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let point_width = w / freq.len() as f32;
    let denom = position_denom(freq.len());

    let points: Vec<(f32, f32)> = freq
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            (
                i as f32 * point_width,
                h - v as f32 / 255.0 * h * s.sensitivity,
            )
        })
        .collect();

    // Fill under the line first so the stroke stays on top.
    for (i, &(x, y)) in points.iter().enumerate() {
        let color = s.color_at(i as f32 / denom);
        let top = s.background_color.lerp(color, 0.5);
        canvas.fill_rect_vgradient(
            x,
            y,
            point_width,
            h - y,
            &[(0.0, top), (1.0, s.background_color)],
        );
    }
    for (i, pair) in points.windows(2).enumerate() {
        let color = s.color_at(i as f32 / denom);
        canvas.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, color, 2.0);
    }
}

/// Polyline from time-domain samples, vertically centered.
pub(crate) fn wave(canvas: &mut Canvas, s: &VisualizerSettings, time: &[u8]) {
    if time.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let slice_width = w / time.len() as f32;
    let denom = position_denom(time.len());

    let mut prev = None;
    for (i, &v) in time.iter().enumerate() {
        let amplitude = (v as f32 / 128.0 - 1.0) * s.sensitivity;
        let x = i as f32 * slice_width;
        let y = h / 2.0 + amplitude * h / 2.0;
        if let Some((px, py)) = prev {
            let color = s.color_at(i as f32 / denom);
            canvas.line(px, py, x, y, color, 2.0);
        }
        prev = Some((x, y));
    }
    if let Some((px, py)) = prev {
        canvas.line(px, py, w, h / 2.0, s.color_at(1.0), 2.0);
    }
}

/// Two mirrored time-domain waveforms around a stroked centerline.
pub(crate) fn dual(canvas: &mut Canvas, s: &VisualizerSettings, time: &[u8]) {
    if time.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_y = h / 2.0;
    let slice_width = w / time.len() as f32;
    let denom = position_denom(time.len());

    let mut prev_top = None;
    let mut prev_bottom = None;
    for (i, &v) in time.iter().enumerate() {
        let amplitude = v as f32 / 255.0 * s.sensitivity;
        let x = i as f32 * slice_width;
        let top = center_y - amplitude * (h / 4.0);
        let bottom = center_y + amplitude * (h / 4.0);
        let color = s.color_at(i as f32 / denom);
        if let Some((px, py)) = prev_top {
            canvas.line(px, py, x, top, color, 2.0);
        }
        if let Some((px, py)) = prev_bottom {
            canvas.line(px, py, x, bottom, color, 2.0);
        }
        prev_top = Some((x, top));
        prev_bottom = Some((x, bottom));
    }
    canvas.line(0.0, center_y, w, center_y, s.color_at(0.5).adjust(-40), 1.0);
}

/// Radial spokes out of a fixed ring, one per frequency bin.
pub(crate) fn circular(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8]) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_x = w / 2.0;
    let center_y = h / 2.0;
    let radius = w.min(h) / 3.0;
    let angle_step = TAU / freq.len() as f32;
    let denom = position_denom(freq.len());

    for (i, &v) in freq.iter().enumerate() {
        let angle = i as f32 * angle_step;
        let spoke = v as f32 / 255.0 * radius * s.sensitivity;
        let (sin, cos) = angle.sin_cos();
        let color = s.color_at(i as f32 / denom);
        canvas.line(
            center_x + cos * radius,
            center_y + sin * radius,
            center_x + cos * (radius + spoke),
            center_y + sin * (radius + spoke),
            color,
            2.0,
        );
    }
    canvas.fill_disc(center_x, center_y, radius * 0.1, s.color_at(0.0));
}

/// Denser sunburst: 64 spokes sampled at stride 2 across the bins.
pub(crate) fn radial(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8]) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_x = w / 2.0;
    let center_y = h / 2.0;
    let radius = w.min(h) * 0.3;
    const SPOKES: usize = 64;

    for i in 0..SPOKES {
        let angle = i as f32 / SPOKES as f32 * TAU;
        let v = freq[(i * 2).min(freq.len() - 1)];
        let spoke = v as f32 / 255.0 * radius * s.sensitivity;
        let (sin, cos) = angle.sin_cos();
        let color = s.color_at(i as f32 / (SPOKES - 1) as f32);
        canvas.line(
            center_x + cos * radius,
            center_y + sin * radius,
            center_x + cos * (radius + spoke),
            center_y + sin * (radius + spoke),
            color,
            4.0,
        );
    }
}

/// Particles orbiting the center, distance driven by their bin's magnitude.
pub(crate) fn particles(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8], clock: f32) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_x = w / 2.0;
    let center_y = h / 2.0;
    let count = s.particle_count as usize;
    let denom = position_denom(count);

    for i in 0..count {
        let fraction = i as f32 / count as f32;
        let bin = ((fraction * freq.len() as f32) as usize).min(freq.len() - 1);
        let intensity = freq[bin] as f32 / 255.0;
        let angle = fraction * TAU + clock;
        let distance = intensity * w.min(h) * 0.4 * s.sensitivity;
        let (sin, cos) = angle.sin_cos();
        let size = 2.0 + intensity * 6.0;
        canvas.fill_disc_soft(
            center_x + cos * distance,
            center_y + sin * distance,
            size,
            s.color_at(i as f32 / denom),
        );
    }
}

/// Polyline along a three-turn spiral with periodic glow dots.
pub(crate) fn spiral(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8], clock: f32) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_x = w / 2.0;
    let center_y = h / 2.0;
    const POINTS: usize = 200;
    const TURNS: f32 = 3.0;
    let t = clock * 0.5;

    let point_at = |i: usize| {
        let progress = i as f32 / POINTS as f32;
        let angle = progress * TAU * TURNS + t;
        let bin = ((progress * freq.len() as f32) as usize).min(freq.len() - 1);
        let intensity = freq[bin] as f32 / 255.0 * s.sensitivity;
        let distance = progress * w.min(h) * 0.4 * (0.5 + intensity);
        let (sin, cos) = angle.sin_cos();
        (
            center_x + cos * distance,
            center_y + sin * distance,
            progress,
        )
    };

    let mut prev = None;
    for i in 0..POINTS {
        let (x, y, progress) = point_at(i);
        if let Some((px, py)) = prev {
            canvas.line(px, py, x, y, s.color_at(progress), 2.0);
        }
        prev = Some((x, y));
    }
    for i in (0..POINTS).step_by(5) {
        let (x, y, progress) = point_at(i);
        canvas.fill_disc_soft(x, y, 4.0, s.color_at(progress));
    }
}

/// Closed polygon whose radius pulses with magnitude plus a periodic wobble.
pub(crate) fn blob(canvas: &mut Canvas, s: &VisualizerSettings, freq: &[u8], clock: f32) {
    if freq.is_empty() {
        return;
    }
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let center_x = w / 2.0;
    let center_y = h / 2.0;
    const POINTS: usize = 32;
    let base_radius = w.min(h) * 0.2;

    let mut outline = Vec::with_capacity(POINTS + 1);
    for i in 0..=POINTS {
        let fraction = i as f32 / POINTS as f32;
        let angle = fraction * TAU;
        let bin = ((fraction * freq.len() as f32) as usize).min(freq.len() - 1);
        let intensity = freq[bin] as f32 / 255.0 * s.sensitivity;
        let wobble = (angle * 3.0 + clock * 2.0).sin() * 0.1;
        let radius = base_radius * (1.0 + intensity + wobble);
        let (sin, cos) = angle.sin_cos();
        outline.push((center_x + cos * radius, center_y + sin * radius));
    }

    let color = s.color_at(0.5);
    canvas.fill_polygon_radial(
        &outline,
        center_x,
        center_y,
        base_radius * 2.0,
        &[
            (0.0, color.adjust(40)),
            (0.7, color),
            (1.0, color.adjust(-40)),
        ],
    );
    canvas.stroke_polygon(&outline, color, 2.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::settings::Style;

    fn test_settings() -> VisualizerSettings {
        VisualizerSettings::default()
    }

    #[test]
    fn empty_sample_slices_draw_nothing() {
        let mut canvas = Canvas::new(16, 16);
        let s = test_settings();
        canvas.fill(s.background_color);
        bars(&mut canvas, &s, &[]);
        wave(&mut canvas, &s, &[]);
        blob(&mut canvas, &s, &[], 0.0);
        assert!(canvas.pixels().iter().all(|&p| p == s.background_color));
    }

    #[test]
    fn zero_magnitudes_leave_bars_flat() {
        let mut canvas = Canvas::new(32, 16);
        let s = test_settings();
        canvas.fill(s.background_color);
        bars(&mut canvas, &s, &[0u8; 128]);
        assert!(canvas.pixels().iter().all(|&p| p == s.background_color));
    }

    #[test]
    fn nonzero_magnitudes_touch_the_surface() {
        let mut canvas = Canvas::new(32, 16);
        let s = test_settings();
        canvas.fill(s.background_color);
        bars(&mut canvas, &s, &[200u8; 128]);
        assert!(canvas.pixels().iter().any(|&p| p != s.background_color));
    }

    #[test]
    fn single_bin_input_does_not_panic() {
        let mut canvas = Canvas::new(16, 16);
        let mut s = test_settings();
        canvas.fill(s.background_color);
        for style in [
            Style::Bars,
            Style::Wave,
            Style::Circular,
            Style::Radial,
            Style::Spectrum,
            Style::Particles,
            Style::Symmetrical,
            Style::Spiral,
            Style::Blob,
            Style::Line,
            Style::Dual,
        ] {
            s.style = style;
            let data = [180u8];
            match style {
                Style::Bars => bars(&mut canvas, &s, &data),
                Style::Wave => wave(&mut canvas, &s, &data),
                Style::Circular => circular(&mut canvas, &s, &data),
                Style::Radial => radial(&mut canvas, &s, &data),
                Style::Spectrum => spectrum(&mut canvas, &s, &data),
                Style::Particles => particles(&mut canvas, &s, &data, 0.3),
                Style::Symmetrical => symmetrical(&mut canvas, &s, &data),
                Style::Spiral => spiral(&mut canvas, &s, &data, 0.3),
                Style::Blob => blob(&mut canvas, &s, &data, 0.3),
                Style::Line => line(&mut canvas, &s, &data),
                Style::Dual => dual(&mut canvas, &s, &data),
            }
        }
    }
}
