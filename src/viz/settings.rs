// src/viz/settings.rs
//! Visualizer configuration: styles, colors, and clamped numeric parameters.

use serde::{Deserialize, Serialize};

use crate::render::color::Rgb;
use crate::render::palette::Palette;

pub const SENSITIVITY_RANGE: (f32, f32) = (0.5, 2.0);
pub const ANIMATION_SPEED_RANGE: (f32, f32) = (0.5, 2.0);
pub const GLOW_INTENSITY_RANGE: (f32, f32) = (0.0, 20.0);
pub const BAR_SPACING_RANGE: (f32, f32) = (0.0, 5.0);
pub const PARTICLE_COUNT_RANGE: (u32, u32) = (20, 200);

/// The eleven visualization styles. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Bars,
    Wave,
    Circular,
    Radial,
    Spectrum,
    Particles,
    Symmetrical,
    Spiral,
    Blob,
    Line,
    Dual,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Bars => "bars",
            Style::Wave => "wave",
            Style::Circular => "circular",
            Style::Radial => "radial",
            Style::Spectrum => "spectrum",
            Style::Particles => "particles",
            Style::Symmetrical => "symmetrical",
            Style::Spiral => "spiral",
            Style::Blob => "blob",
            Style::Line => "line",
            Style::Dual => "dual",
        }
    }

    /// Next style in display order, wrapping. Used by the host UI.
    pub fn cycle(self) -> Style {
        match self {
            Style::Bars => Style::Wave,
            Style::Wave => Style::Circular,
            Style::Circular => Style::Radial,
            Style::Radial => Style::Spectrum,
            Style::Spectrum => Style::Particles,
            Style::Particles => Style::Symmetrical,
            Style::Symmetrical => Style::Spiral,
            Style::Spiral => Style::Blob,
            Style::Blob => Style::Line,
            Style::Line => Style::Dual,
            Style::Dual => Style::Bars,
        }
    }

    /// Whether this style consumes the bar-spacing setting.
    pub fn uses_bar_spacing(self) -> bool {
        matches!(self, Style::Bars | Style::Spectrum | Style::Symmetrical)
    }
}

/// Current visualization parameters, shared with every render function.
///
/// All numeric fields are clamped to their documented ranges at assignment;
/// out-of-range inputs are clamped, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerSettings {
    pub style: Style,
    pub primary_color: Rgb,
    pub background_color: Rgb,
    pub sensitivity: f32,
    pub color_palette: Palette,
    pub animation_speed: f32,
    pub glow_enabled: bool,
    pub glow_intensity: f32,
    pub bar_spacing: f32,
    pub particle_count: u32,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            style: Style::Bars,
            primary_color: Rgb::new(0xff, 0x00, 0x00),
            background_color: Rgb::new(0x0a, 0x0a, 0x0a),
            sensitivity: 1.0,
            color_palette: Palette::Single,
            animation_speed: 1.0,
            glow_enabled: false,
            glow_intensity: 10.0,
            bar_spacing: 1.0,
            particle_count: 80,
        }
    }
}

impl VisualizerSettings {
    /// Resolve the color at `position` through the active palette.
    pub fn color_at(&self, position: f32) -> Rgb {
        self.color_palette.color_at(position, self.primary_color)
    }

    /// Merge a partial update, clamping numeric fields. Unspecified fields
    /// keep their previous values.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(style) = update.style {
            self.style = style;
        }
        if let Some(color) = update.primary_color {
            self.primary_color = color;
        }
        if let Some(color) = update.background_color {
            self.background_color = color;
        }
        if let Some(v) = update.sensitivity {
            self.sensitivity = v.clamp(SENSITIVITY_RANGE.0, SENSITIVITY_RANGE.1);
        }
        if let Some(palette) = update.color_palette {
            self.color_palette = palette;
        }
        if let Some(v) = update.animation_speed {
            self.animation_speed = v.clamp(ANIMATION_SPEED_RANGE.0, ANIMATION_SPEED_RANGE.1);
        }
        if let Some(v) = update.glow_enabled {
            self.glow_enabled = v;
        }
        if let Some(v) = update.glow_intensity {
            self.glow_intensity = v.clamp(GLOW_INTENSITY_RANGE.0, GLOW_INTENSITY_RANGE.1);
        }
        if let Some(v) = update.bar_spacing {
            self.bar_spacing = v.clamp(BAR_SPACING_RANGE.0, BAR_SPACING_RANGE.1);
        }
        if let Some(v) = update.particle_count {
            self.particle_count = v.clamp(PARTICLE_COUNT_RANGE.0, PARTICLE_COUNT_RANGE.1);
        }
    }
}

/// Partial settings update; only the provided fields are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub style: Option<Style>,
    pub primary_color: Option<Rgb>,
    pub background_color: Option<Rgb>,
    pub sensitivity: Option<f32>,
    pub color_palette: Option<Palette>,
    pub animation_speed: Option<f32>,
    pub glow_enabled: Option<bool>,
    pub glow_intensity: Option<f32>,
    pub bar_spacing: Option<f32>,
    pub particle_count: Option<u32>,
}

impl From<VisualizerSettings> for SettingsUpdate {
    fn from(s: VisualizerSettings) -> Self {
        Self {
            style: Some(s.style),
            primary_color: Some(s.primary_color),
            background_color: Some(s.background_color),
            sensitivity: Some(s.sensitivity),
            color_palette: Some(s.color_palette),
            animation_speed: Some(s.animation_speed),
            glow_enabled: Some(s.glow_enabled),
            glow_intensity: Some(s.glow_intensity),
            bar_spacing: Some(s.bar_spacing),
            particle_count: Some(s.particle_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_values_clamp_to_bounds() {
        let mut settings = VisualizerSettings::default();
        settings.apply(&SettingsUpdate {
            sensitivity: Some(99.0),
            animation_speed: Some(0.01),
            glow_intensity: Some(-4.0),
            bar_spacing: Some(12.0),
            particle_count: Some(5),
            ..Default::default()
        });
        assert_eq!(settings.sensitivity, 2.0);
        assert_eq!(settings.animation_speed, 0.5);
        assert_eq!(settings.glow_intensity, 0.0);
        assert_eq!(settings.bar_spacing, 5.0);
        assert_eq!(settings.particle_count, 20);
    }

    #[test]
    fn in_range_values_pass_through_exactly() {
        let mut settings = VisualizerSettings::default();
        settings.apply(&SettingsUpdate {
            sensitivity: Some(1.25),
            particle_count: Some(150),
            ..Default::default()
        });
        assert_eq!(settings.sensitivity, 1.25);
        assert_eq!(settings.particle_count, 150);
    }

    #[test]
    fn partial_update_leaves_other_fields_untouched() {
        let mut settings = VisualizerSettings::default();
        settings.apply(&SettingsUpdate {
            style: Some(Style::Blob),
            ..Default::default()
        });
        assert_eq!(settings.style, Style::Blob);
        assert_eq!(settings.primary_color, Rgb::new(0xff, 0, 0));
        assert_eq!(settings.sensitivity, 1.0);
    }

    #[test]
    fn defaults_match_documented_tuple() {
        let d = VisualizerSettings::default();
        assert_eq!(d.style, Style::Bars);
        assert_eq!(d.primary_color.to_hex(), "#ff0000");
        assert_eq!(d.background_color.to_hex(), "#0a0a0a");
        assert_eq!(d.sensitivity, 1.0);
        assert_eq!(d.color_palette, Palette::Single);
        assert_eq!(d.animation_speed, 1.0);
        assert!(!d.glow_enabled);
        assert_eq!(d.bar_spacing, 1.0);
        assert_eq!(d.particle_count, 80);
    }

    #[test]
    fn style_cycle_covers_all_eleven() {
        let mut current = Style::Bars;
        let mut count = 1;
        loop {
            current = current.cycle();
            if current == Style::Bars {
                break;
            }
            count += 1;
        }
        assert_eq!(count, 11);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let mut settings = VisualizerSettings::default();
        settings.style = Style::Spiral;
        settings.color_palette = Palette::Neon;
        settings.glow_enabled = true;
        let json = serde_json::to_string(&settings).unwrap();
        let back: VisualizerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
