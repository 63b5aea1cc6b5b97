use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::error::{CardError, CardResult};

/// Opaque RGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(input: &str) -> CardResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CardError::config(format!("invalid color '{input}'")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| CardError::config(format!("invalid color '{input}'")))
        };
        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, 255])
    }
}

impl TryFrom<String> for Color {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// Color scheme and decorative assets of one suit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitStyle {
    pub suit: String,
    pub primary: Color,
    pub secondary: Color,
    /// Full-bleed texture, relative to the asset root.
    pub texture: PathBuf,
    /// Small motif used for chess tiling, relative to the asset root.
    pub logo: PathBuf,
}

/// Lookup table keyed by suit name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable {
    styles: Vec<SuitStyle>,
}

impl StyleTable {
    pub fn new(styles: Vec<SuitStyle>) -> Self {
        Self { styles }
    }

    /// The ten suits of the base game.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_SUITS.iter().map(BuiltinSuit::to_style).collect())
    }

    pub fn list(&self) -> &[SuitStyle] {
        &self.styles
    }

    /// Resolve a suit by name. Exact matches win over case-insensitive ones.
    pub fn get(&self, suit: &str) -> CardResult<&SuitStyle> {
        let suit = suit.trim();
        self.styles
            .iter()
            .find(|style| style.suit == suit)
            .or_else(|| {
                self.styles
                    .iter()
                    .find(|style| style.suit.to_lowercase() == suit.to_lowercase())
            })
            .ok_or_else(|| CardError::style_lookup(suit))
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

struct BuiltinSuit {
    name: &'static str,
    slug: &'static str,
    primary: Color,
    secondary: Color,
}

impl BuiltinSuit {
    fn to_style(&self) -> SuitStyle {
        SuitStyle {
            suit: self.name.to_string(),
            primary: self.primary,
            secondary: self.secondary,
            texture: PathBuf::from(format!("textures/{}.png", self.slug)),
            logo: PathBuf::from(format!("logos/{}.png", self.slug)),
        }
    }
}

macro_rules! suit {
    ($name:expr, $slug:expr, $primary:expr, $secondary:expr) => {
        BuiltinSuit {
            name: $name,
            slug: $slug,
            primary: Color($primary),
            secondary: Color($secondary),
        }
    };
}

// primary is the pastel tone, secondary its lighter companion
static BUILTIN_SUITS: &[BuiltinSuit] = &[
    suit!("Chat", "chat", [0xE6, 0xA8, 0xA8], [0xF5, 0xD4, 0xD4]),
    suit!("Lieu", "lieu", [0x8B, 0x8B, 0x8B], [0xC4, 0xC4, 0xC4]),
    suit!("Rituel", "rituel", [0x8B, 0xA8, 0xE6], [0xC4, 0xD4, 0xF5]),
    suit!("Esprit", "esprit", [0xA8, 0xE6, 0xA8], [0xD4, 0xF5, 0xD4]),
    suit!("Festival", "festival", [0xE6, 0xA8, 0xE6], [0xF5, 0xD4, 0xF5]),
    suit!("Démon", "demon", [0xC8, 0xA8, 0xE6], [0xE4, 0xD4, 0xF5]),
    suit!("Relique", "relique", [0xB8, 0xB8, 0xB8], [0xDC, 0xDC, 0xDC]),
    suit!("Idole", "idole", [0xE6, 0xE6, 0xA8], [0xF5, 0xF5, 0xD4]),
    suit!("Nourriture", "nourriture", [0xD4, 0xB0, 0x8A], [0xE8, 0xCD, 0xB0]),
    suit!("Potion", "potion", [0xA8, 0xD4, 0xE6], [0xD4, 0xE8, 0xF5]),
];
