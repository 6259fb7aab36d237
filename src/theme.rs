//! Track presets
//!
//! Static catalog of visual/narrative themes. The simulation only reads the
//! obstacle palette; name and vibe are passed through to the commentator.

use serde::{Deserialize, Serialize};

/// Linear RGBA color (components 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xffffff);

    /// Opaque color from a `0xRRGGBB` literal
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// `#rrggbb`, alpha dropped
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A named track preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackTheme {
    /// Stable key (used in settings)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub road_color: Color,
    pub line_color: Color,
    /// Obstacle palette, never empty
    pub obstacle_colors: &'static [Color],
    pub description: &'static str,
    /// Mood words fed to the commentator
    pub vibe: &'static str,
}

/// All presets, in menu order
pub static THEMES: [TrackTheme; 3] = [
    TrackTheme {
        id: "CYBERPUNK",
        name: "Neo-Tokyo",
        road_color: Color::rgb(0x1a1a2e),
        line_color: Color::rgb(0x00f2ff),
        obstacle_colors: &[
            Color::rgb(0xff0055),
            Color::rgb(0x7000ff),
            Color::rgb(0x00ff9f),
        ],
        description: "A neon-drenched cityscape with glowing grids.",
        vibe: "futuristic, fast-paced, synthwave",
    },
    TrackTheme {
        id: "DESERT",
        name: "Dusty Sahara",
        road_color: Color::rgb(0x3d2b1f),
        line_color: Color::rgb(0xf4a460),
        obstacle_colors: &[
            Color::rgb(0x8b4513),
            Color::rgb(0xd2691e),
            Color::rgb(0xa0522d),
        ],
        description: "Scorching sands and rocky outposts.",
        vibe: "rugged, intense, dusty",
    },
    TrackTheme {
        id: "ARCTIC",
        name: "Frozen Tundra",
        road_color: Color::rgb(0xd1e5f0),
        line_color: Color::rgb(0xffffff),
        obstacle_colors: &[
            Color::rgb(0x4682b4),
            Color::rgb(0x5f9ea0),
            Color::rgb(0xb0c4de),
        ],
        description: "Slippery ice roads and blinding snow.",
        vibe: "cold, precise, crystalline",
    },
];

/// First preset in the catalog
pub fn default_theme() -> &'static TrackTheme {
    &THEMES[0]
}

/// Look up a preset by id or display name (case-insensitive)
pub fn find(key: &str) -> Option<&'static TrackTheme> {
    let key = key.trim();
    THEMES
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(key) || t.name.eq_ignore_ascii_case(key))
}

/// Like [`find`], falling back to the default preset
pub fn resolve(key: &str) -> &'static TrackTheme {
    find(key).unwrap_or_else(default_theme)
}
