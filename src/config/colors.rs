//! Light and dark palettes for the TUI.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

use crate::domain::Theme;

/// Resolved colours for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub active_border: Color,
    pub inactive_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub bookmark: Color,
    pub metadata_author: Color,
    pub metadata_date: Color,
    pub metadata_link: Color,
    pub error: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: Color::Reset,
            text: Color::Black,
            muted: Color::DarkGray,
            active_border: Color::Blue,
            inactive_border: Color::Gray,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            bookmark: Color::Magenta,
            metadata_author: Color::Rgb(135, 95, 0),
            metadata_date: Color::Rgb(135, 95, 0),
            metadata_link: Color::Blue,
            error: Color::Red,
            status_fg: Color::Black,
            status_bg: Color::Gray,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            text: Color::White,
            muted: Color::DarkGray,
            active_border: Color::Cyan,
            inactive_border: Color::DarkGray,
            selection_bg: Color::Cyan,
            selection_fg: Color::Black,
            bookmark: Color::LightMagenta,
            metadata_author: Color::Yellow,
            metadata_date: Color::Yellow,
            metadata_link: Color::LightBlue,
            error: Color::LightRed,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }

    fn with_overrides(mut self, o: &ColorConfig) -> Self {
        let fields = [
            (&mut self.background, o.background),
            (&mut self.text, o.text),
            (&mut self.muted, o.muted),
            (&mut self.active_border, o.active_border),
            (&mut self.inactive_border, o.inactive_border),
            (&mut self.selection_bg, o.selection_bg),
            (&mut self.selection_fg, o.selection_fg),
            (&mut self.bookmark, o.bookmark),
            (&mut self.metadata_author, o.metadata_author),
            (&mut self.metadata_date, o.metadata_date),
            (&mut self.metadata_link, o.metadata_link),
            (&mut self.error, o.error),
            (&mut self.status_fg, o.status_fg),
            (&mut self.status_bg, o.status_bg),
        ];
        for (slot, value) in fields {
            if let Some(color) = value {
                *slot = color;
            }
        }
        self
    }
}

/// User overrides for a palette. Unset fields keep the theme's default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub background: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub text: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub muted: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub active_border: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub inactive_border: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_bg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub bookmark: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_author: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_date: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_link: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub error: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_fg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_bg: Option<Color>,
}

/// The `[colors.light]` and `[colors.dark]` sections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub light: ColorConfig,
    pub dark: ColorConfig,
}

impl ThemeColors {
    pub fn palette(&self, theme: Theme) -> Palette {
        match theme {
            Theme::Light => Palette::light().with_overrides(&self.light),
            Theme::Dark => Palette::dark().with_overrides(&self.dark),
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color_string(&s).map(Some).map_err(de::Error::custom)
}

/// Parse a named colour ("DarkGray", case-insensitive) or a hex code ("#RRGGBB", "#RGB").
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    let color = match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        _ => return Err(format!("Unknown color: {}", s)),
    };
    Ok(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Some(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color_string("Cyan").unwrap(), Color::Cyan);
        assert_eq!(parse_color_string("darkgrey").unwrap(), Color::DarkGray);
        assert!(parse_color_string("chartreuse").is_err());
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color_string("#FF0000").unwrap(), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color_string("#0F0").unwrap(), Color::Rgb(0, 255, 0));
        assert!(parse_color_string("#GGGGGG").is_err());
        assert!(parse_color_string("#12345").is_err());
    }

    #[test]
    fn test_palette_per_theme() {
        let colors = ThemeColors::default();
        assert_eq!(colors.palette(Theme::Light), Palette::light());
        assert_eq!(colors.palette(Theme::Dark), Palette::dark());
        assert_ne!(Palette::light().text, Palette::dark().text);
    }

    #[test]
    fn test_partial_override_keeps_theme_defaults() {
        let colors: ThemeColors = toml::from_str(
            r##"
[dark]
active_border = "#FF0000"
"##,
        )
        .unwrap();
        let dark = colors.palette(Theme::Dark);
        assert_eq!(dark.active_border, Color::Rgb(255, 0, 0));
        assert_eq!(dark.text, Palette::dark().text);
        assert_eq!(colors.palette(Theme::Light), Palette::light());
    }
}
