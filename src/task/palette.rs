use crate::api::types::ColorKey;
use crate::task::priority::DisplayPriority;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of project and label colors known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    BerryRed,
    Red,
    Orange,
    Yellow,
    OliveGreen,
    LimeGreen,
    Green,
    MintGreen,
    Teal,
    SkyBlue,
    LightBlue,
    Blue,
    Grape,
    Violet,
    Lavender,
    Magenta,
    Salmon,
    Charcoal,
    Grey,
    Taupe,
}

impl Color {
    /// In legacy id order: `ALL[0]` is id 30, `ALL[19]` is id 49
    pub const ALL: [Color; 20] = [
        Color::BerryRed,
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::OliveGreen,
        Color::LimeGreen,
        Color::Green,
        Color::MintGreen,
        Color::Teal,
        Color::SkyBlue,
        Color::LightBlue,
        Color::Blue,
        Color::Grape,
        Color::Violet,
        Color::Lavender,
        Color::Magenta,
        Color::Salmon,
        Color::Charcoal,
        Color::Grey,
        Color::Taupe,
    ];

    const LEGACY_BASE: u32 = 30;

    pub fn name(self) -> &'static str {
        match self {
            Color::BerryRed => "berry_red",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::OliveGreen => "olive_green",
            Color::LimeGreen => "lime_green",
            Color::Green => "green",
            Color::MintGreen => "mint_green",
            Color::Teal => "teal",
            Color::SkyBlue => "sky_blue",
            Color::LightBlue => "light_blue",
            Color::Blue => "blue",
            Color::Grape => "grape",
            Color::Violet => "violet",
            Color::Lavender => "lavender",
            Color::Magenta => "magenta",
            Color::Salmon => "salmon",
            Color::Charcoal => "charcoal",
            Color::Grey => "grey",
            Color::Taupe => "taupe",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Color::BerryRed => "#b8256f",
            Color::Red => "#db4035",
            Color::Orange => "#ff9933",
            Color::Yellow => "#fad000",
            Color::OliveGreen => "#afb83b",
            Color::LimeGreen => "#7ecc49",
            Color::Green => "#299438",
            Color::MintGreen => "#6accbc",
            Color::Teal => "#158fad",
            Color::SkyBlue => "#14aaf5",
            Color::LightBlue => "#96c3eb",
            Color::Blue => "#4073ff",
            Color::Grape => "#884dff",
            Color::Violet => "#af38eb",
            Color::Lavender => "#eb96eb",
            Color::Magenta => "#e05194",
            Color::Salmon => "#ff8d85",
            Color::Charcoal => "#808080",
            Color::Grey => "#b8b8b8",
            Color::Taupe => "#ccac93",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("gray") {
            return Some(Color::Grey);
        }
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }

    pub fn from_legacy_id(id: u32) -> Option<Self> {
        let index = id.checked_sub(Self::LEGACY_BASE)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn from_key(key: &ColorKey) -> Option<Self> {
        match key {
            ColorKey::Legacy(id) => Self::from_legacy_id(*id),
            ColorKey::Named(name) => Self::from_name(name),
        }
    }
}

/// Hex colors used when projecting tasks for display.
///
/// Built once and shared by reference; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: HashMap<Color, String>,
    priorities: HashMap<DisplayPriority, String>,
    fallback: String,
}

impl Palette {
    /// The service's own color scheme. Unknown keys map to an empty string.
    pub fn standard() -> Self {
        let colors = Color::ALL
            .into_iter()
            .map(|color| (color, color.hex().to_string()))
            .collect();

        let priorities = [
            (DisplayPriority::P1, "#d1453b"),
            (DisplayPriority::P2, "#eb8909"),
            (DisplayPriority::P3, "#246fe0"),
            (DisplayPriority::P4, "#000000"),
        ]
        .into_iter()
        .map(|(priority, hex)| (priority, hex.to_string()))
        .collect();

        Self {
            colors,
            priorities,
            fallback: String::new(),
        }
    }

    /// Same palette with a different value for unknown keys
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn color_hex(&self, key: &ColorKey) -> &str {
        Color::from_key(key)
            .and_then(|color| self.colors.get(&color))
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn priority_hex(&self, priority: Option<DisplayPriority>) -> &str {
        priority
            .and_then(|p| self.priorities.get(&p))
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_ids_and_names_agree() {
        for (offset, color) in Color::ALL.into_iter().enumerate() {
            let id = 30 + offset as u32;
            assert_eq!(Color::from_legacy_id(id), Some(color));
            assert_eq!(Color::from_name(color.name()), Some(color));
        }
        assert_eq!(Color::from_legacy_id(29), None);
        assert_eq!(Color::from_legacy_id(50), None);
        assert_eq!(Color::from_legacy_id(0), None);
    }

    #[test]
    fn test_palette_resolves_both_key_styles() {
        let palette = Palette::standard();
        assert_eq!(palette.color_hex(&ColorKey::Legacy(30)), "#b8256f");
        assert_eq!(palette.color_hex(&ColorKey::from("berry_red")), "#b8256f");
        assert_eq!(palette.color_hex(&ColorKey::from("gray")), "#b8b8b8");
    }

    #[test]
    fn test_palette_unknown_keys_use_fallback() {
        let palette = Palette::standard();
        assert_eq!(palette.color_hex(&ColorKey::from("chartreuse")), "");
        assert_eq!(palette.color_hex(&ColorKey::Legacy(99)), "");

        let palette = palette.with_fallback("#808080");
        assert_eq!(palette.color_hex(&ColorKey::default()), "#808080");
        assert_eq!(palette.priority_hex(None), "#808080");
    }

    #[test]
    fn test_priority_colors() {
        let palette = Palette::standard();
        assert_eq!(palette.priority_hex(DisplayPriority::from_raw(4)), "#d1453b");
        assert_eq!(palette.priority_hex(DisplayPriority::from_raw(1)), "#000000");
    }
}
