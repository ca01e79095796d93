//! Immutable configuration snapshot handed to every component.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reference::PoiCategory;

/// RGBA color used by the walkability texture and every overlay primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Color {
    /// Fully transparent black, used for blocked cells.
    pub const TRANSPARENT: Self = Self::from_rgba_u8(0, 0, 0, 0);

    /// Creates a color from byte RGBA channels.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB channels.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 0xff)
    }

    /// Red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Packs the color into a texture pixel with red in the lowest byte.
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        u32::from_le_bytes([self.red, self.green, self.blue, self.alpha])
    }

    /// Unpacks a texture pixel produced by [`Color::to_packed`].
    #[must_use]
    pub const fn from_packed(pixel: u32) -> Self {
        let [red, green, blue, alpha] = pixel.to_le_bytes();
        Self::from_rgba_u8(red, green, blue, alpha)
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` notation.
    pub fn parse_hex(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(value.to_owned());
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |index: usize| {
            digits
                .get(index..index + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)
        };
        let alpha = if digits.len() == 8 { channel(6)? } else { 0xff };

        Ok(Self::from_rgba_u8(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// When the overlay should be visible relative to the in-game map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Visible while the in-game map is closed.
    #[default]
    #[serde(alias = "closed")]
    MapClosed,
    /// Visible while the in-game map is open.
    #[serde(alias = "open")]
    MapOpen,
    /// Always visible while the process is available.
    Always,
}

/// Guide-line routing policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    /// One line from the player to each target, inset at both ends.
    Full,
    /// A capped line segment followed by a diamond pointing at the target.
    #[default]
    Segmented,
}

/// Placement of the overlay window relative to the game window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPlacement {
    /// Top-left corner of the game window.
    Left,
    /// Top-right corner of the game window.
    #[default]
    Right,
    /// The whole game window, inset by the margin.
    Fullscreen,
}

/// Languages available in the reference string table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// English.
    #[default]
    EnUs,
    /// Traditional Chinese.
    ZhTw,
    /// German.
    DeDe,
    /// Spanish (Spain).
    EsEs,
    /// French.
    FrFr,
    /// Italian.
    ItIt,
    /// Korean.
    KoKr,
    /// Polish.
    PlPl,
    /// Spanish (Mexico).
    EsMx,
    /// Japanese.
    JaJp,
    /// Portuguese (Brazil).
    PtBr,
    /// Russian.
    RuRu,
    /// Simplified Chinese.
    ZhCn,
}

impl Language {
    const ALL: [(Self, &'static str); 13] = [
        (Self::EnUs, "enUS"),
        (Self::ZhTw, "zhTW"),
        (Self::DeDe, "deDE"),
        (Self::EsEs, "esES"),
        (Self::FrFr, "frFR"),
        (Self::ItIt, "itIT"),
        (Self::KoKr, "koKR"),
        (Self::PlPl, "plPL"),
        (Self::EsMx, "esMX"),
        (Self::JaJp, "jaJP"),
        (Self::PtBr, "ptBR"),
        (Self::RuRu, "ruRU"),
        (Self::ZhCn, "zhCN"),
    ];

    /// Resolves a locale code such as `deDE`; unknown codes fall back to English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .iter()
            .find(|(_, candidate)| *candidate == code)
            .map_or(Self::EnUs, |(language, _)| *language)
    }

    /// Locale code of the language.
    #[must_use]
    pub fn code(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(language, _)| *language == self)
            .map_or("enUS", |(_, code)| *code)
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_owned()
    }
}

/// Colors used for every drawn element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Walkable cells of the map texture.
    pub walkable: Color,
    /// Label text.
    pub text: Color,
    /// Waypoint markers.
    pub waypoint: Color,
    /// Portal and exit markers.
    pub portal: Color,
    /// Chest markers.
    pub chest: Color,
    /// Quest markers.
    pub quest: Color,
    /// Shrine markers.
    pub shrine: Color,
    /// Well markers.
    pub well: Color,
    /// Inner square of the player marker.
    pub player_inner: Color,
    /// Outer square of the player marker.
    pub player_outer: Color,
    /// Guide lines and diamonds.
    pub line: Color,
}

impl Palette {
    /// Marker color for the point-of-interest category.
    #[must_use]
    pub const fn color_for(&self, category: PoiCategory) -> Color {
        match category {
            PoiCategory::Waypoint => self.waypoint,
            PoiCategory::Portal => self.portal,
            PoiCategory::Chest => self.chest,
            PoiCategory::Quest => self.quest,
            PoiCategory::Shrine => self.shrine,
            PoiCategory::Well => self.well,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            walkable: Color::from_rgba_u8(0xaa, 0xaa, 0xaa, 0x50),
            text: Color::from_rgb_u8(0xff, 0xff, 0xff),
            waypoint: Color::from_rgba_u8(0x16, 0x8e, 0xff, 0xa0),
            portal: Color::from_rgba_u8(0xff, 0xaa, 0x16, 0xa0),
            chest: Color::from_rgba_u8(0xff, 0x8e, 0x16, 0x60),
            quest: Color::from_rgba_u8(0x16, 0xff, 0x8e, 0xa0),
            shrine: Color::from_rgba_u8(0xaa, 0x16, 0xff, 0xa0),
            well: Color::from_rgba_u8(0x16, 0xff, 0xff, 0xa0),
            player_inner: Color::from_rgb_u8(0xff, 0x80, 0x80),
            player_outer: Color::from_rgb_u8(0xff, 0xff, 0xff),
            line: Color::from_rgba_u8(0xcc, 0xcc, 0xcc, 0xcc),
        }
    }
}

/// Immutable configuration snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// When the overlay is visible.
    pub show: DisplayMode,
    /// Language used for labels.
    pub language: Language,
    /// Font used by the text renderer.
    pub font_path: PathBuf,
    /// Label point size.
    pub font_size: f32,
    /// Zoom factor applied after the isometric projection.
    pub scale: f32,
    /// Keeps the player at the view center; the map pans otherwise.
    pub map_centered: bool,
    /// Guide-line routing policy.
    pub line_mode: LineMode,
    /// Overlay window placement.
    pub position: WindowPlacement,
    /// Colors of every drawn element.
    pub colors: Palette,
}

impl Config {
    /// Checks the numeric options that must be strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::NonPositiveScale(self.scale));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::NonPositiveFontSize(self.font_size));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show: DisplayMode::default(),
            language: Language::default(),
            font_path: PathBuf::from("fonts/default.ttf"),
            font_size: 14.0,
            scale: 2.0,
            map_centered: true,
            line_mode: LineMode::default(),
            position: WindowPlacement::default(),
            colors: Palette::default(),
        }
    }
}

/// Errors raised while interpreting configuration values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A color string was not `#RRGGBB` or `#RRGGBBAA`.
    #[error("invalid color `{0}`; expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
    /// The zoom factor must be strictly positive.
    #[error("scale must be positive (received {0})")]
    NonPositiveScale(f32),
    /// The font size must be strictly positive.
    #[error("font_size must be positive (received {0})")]
    NonPositiveFontSize(f32),
}
