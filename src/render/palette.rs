// src/render/palette.rs
//! Fixed color palettes used to tint visualizations by position.

use serde::{Deserialize, Serialize};

use super::color::Rgb;

const RAINBOW: [Rgb; 7] = [
    Rgb::new(0xff, 0x00, 0x00),
    Rgb::new(0xff, 0x7f, 0x00),
    Rgb::new(0xff, 0xff, 0x00),
    Rgb::new(0x00, 0xff, 0x00),
    Rgb::new(0x00, 0x80, 0xff),
    Rgb::new(0x4b, 0x00, 0x82),
    Rgb::new(0x94, 0x00, 0xd3),
];

const FIRE: [Rgb; 5] = [
    Rgb::new(0x80, 0x00, 0x00),
    Rgb::new(0xcc, 0x22, 0x00),
    Rgb::new(0xff, 0x45, 0x00),
    Rgb::new(0xff, 0x8c, 0x00),
    Rgb::new(0xff, 0xd7, 0x00),
];

const OCEAN: [Rgb; 5] = [
    Rgb::new(0x00, 0x1f, 0x3f),
    Rgb::new(0x00, 0x4e, 0x92),
    Rgb::new(0x00, 0x74, 0xd9),
    Rgb::new(0x39, 0xcc, 0xcc),
    Rgb::new(0x7f, 0xdb, 0xff),
];

const SYNTHWAVE: [Rgb; 5] = [
    Rgb::new(0x2b, 0x00, 0x5c),
    Rgb::new(0x8a, 0x2b, 0xe2),
    Rgb::new(0xff, 0x00, 0xff),
    Rgb::new(0xff, 0x14, 0x93),
    Rgb::new(0x00, 0xbf, 0xff),
];

const NEON: [Rgb; 5] = [
    Rgb::new(0x39, 0xff, 0x14),
    Rgb::new(0x00, 0xff, 0xff),
    Rgb::new(0xff, 0x00, 0xff),
    Rgb::new(0xff, 0xff, 0x00),
    Rgb::new(0xff, 0x31, 0x31),
];

/// Ordered, fixed color lists selectable in the visualizer settings.
/// `Single` resolves every position to the configured primary color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Single,
    Rainbow,
    Fire,
    Ocean,
    Synthwave,
    Neon,
}

impl Palette {
    /// Resolve the color at `position` in [0, 1]. Positions index into the
    /// fixed list by floor; there is no interpolation between entries.
    pub fn color_at(self, position: f32, primary: Rgb) -> Rgb {
        let list: &[Rgb] = match self {
            Palette::Single => return primary,
            Palette::Rainbow => &RAINBOW,
            Palette::Fire => &FIRE,
            Palette::Ocean => &OCEAN,
            Palette::Synthwave => &SYNTHWAVE,
            Palette::Neon => &NEON,
        };
        if list.len() == 1 {
            return list[0];
        }
        let p = position.clamp(0.0, 1.0);
        let idx = (p * (list.len() - 1) as f32) as usize;
        list[idx.min(list.len() - 1)]
    }

    /// Next palette in display order, wrapping. Used by the host UI.
    pub fn cycle(self) -> Palette {
        match self {
            Palette::Single => Palette::Rainbow,
            Palette::Rainbow => Palette::Fire,
            Palette::Fire => Palette::Ocean,
            Palette::Ocean => Palette::Synthwave,
            Palette::Synthwave => Palette::Neon,
            Palette::Neon => Palette::Single,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Palette::Single => "single",
            Palette::Rainbow => "rainbow",
            Palette::Fire => "fire",
            Palette::Ocean => "ocean",
            Palette::Synthwave => "synthwave",
            Palette::Neon => "neon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Palette; 6] = [
        Palette::Single,
        Palette::Rainbow,
        Palette::Fire,
        Palette::Ocean,
        Palette::Synthwave,
        Palette::Neon,
    ];

    #[test]
    fn resolution_is_total_over_unit_interval() {
        let primary = Rgb::new(1, 2, 3);
        for palette in ALL {
            for i in 0..=100 {
                let p = i as f32 / 100.0;
                // Must never panic or index out of bounds.
                let _ = palette.color_at(p, primary);
            }
            // Out-of-range positions clamp rather than panic.
            let _ = palette.color_at(-0.5, primary);
            let _ = palette.color_at(1.5, primary);
        }
    }

    #[test]
    fn single_resolves_to_primary() {
        let primary = Rgb::new(0xab, 0xcd, 0xef);
        assert_eq!(Palette::Single.color_at(0.0, primary), primary);
        assert_eq!(Palette::Single.color_at(1.0, primary), primary);
    }

    #[test]
    fn endpoints_hit_first_and_last_entries() {
        let primary = Rgb::BLACK;
        assert_eq!(Palette::Fire.color_at(0.0, primary), FIRE[0]);
        assert_eq!(Palette::Fire.color_at(1.0, primary), FIRE[FIRE.len() - 1]);
    }

    #[test]
    fn cycle_visits_every_palette() {
        let mut seen = vec![Palette::Single];
        let mut current = Palette::Single;
        for _ in 0..5 {
            current = current.cycle();
            assert!(!seen.contains(&current));
            seen.push(current);
        }
        assert_eq!(current.cycle(), Palette::Single);
    }

    #[test]
    fn serde_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&Palette::Synthwave).unwrap(),
            "\"synthwave\""
        );
        let back: Palette = serde_json::from_str("\"ocean\"").unwrap();
        assert_eq!(back, Palette::Ocean);
    }
}
