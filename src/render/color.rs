// src/render/color.rs
//! Structured RGB color with hex parsing/serialization at the boundary.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 24-bit RGB color. All internal color math works on this type; hex
/// strings only appear when parsing user input or persisting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Parse a `#rrggbb` hex string (leading `#` optional).
    pub fn parse(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb::new(r, g, b))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Brighten (positive) or darken (negative) each channel, saturating.
    pub fn adjust(self, amount: i16) -> Rgb {
        let shift = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Rgb::new(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Linear interpolation toward `other` by `t` in [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

/// Resolve a color along a multi-stop vertical/radial gradient.
///
/// `stops` are (position, color) pairs with ascending positions in [0, 1].
/// An empty stop list yields black; `t` outside [0, 1] clamps.
pub fn gradient_color(stops: &[(f32, Rgb)], t: f32) -> Rgb {
    let Some(first) = stops.first() else {
        return Rgb::BLACK;
    };
    let t = t.clamp(0.0, 1.0);
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (p0, c0) = pair[0];
        let (p1, c1) = pair[1];
        if t <= p1 {
            let span = (p1 - p0).max(f32::EPSILON);
            return c0.lerp(c1, (t - p0) / span);
        }
    }
    stops[stops.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::parse("#ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse("0a0a0a"), Some(Rgb::new(10, 10, 10)));
        assert_eq!(Rgb::parse("#ff00"), None);
        assert_eq!(Rgb::parse("#gggggg"), None);
    }

    #[test]
    fn hex_round_trip() {
        let c = Rgb::new(18, 52, 86);
        assert_eq!(Rgb::parse(&c.to_hex()), Some(c));
    }

    #[test]
    fn adjust_saturates_at_channel_bounds() {
        assert_eq!(Rgb::new(250, 10, 128).adjust(40), Rgb::new(255, 50, 168));
        assert_eq!(Rgb::new(10, 200, 0).adjust(-40), Rgb::new(0, 160, 0));
    }

    #[test]
    fn gradient_endpoints_and_midpoint() {
        let stops = [(0.0, Rgb::BLACK), (1.0, Rgb::new(255, 255, 255))];
        assert_eq!(gradient_color(&stops, -1.0), Rgb::BLACK);
        assert_eq!(gradient_color(&stops, 2.0), Rgb::new(255, 255, 255));
        assert_eq!(gradient_color(&stops, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(gradient_color(&[], 0.5), Rgb::BLACK);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c = Rgb::new(255, 0, 0);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<Rgb>("\"#nothex\"").is_err());
    }
}
