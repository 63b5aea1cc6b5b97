use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::style::StyleTable;

/// Historical card designs, collapsed into one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Plain white lower half, no force badge.
    ClassicScroll,
    /// Suit motif tiled in a checkerboard below the artwork.
    #[default]
    ChessTexture,
    /// Full-bleed recolored suit texture below the artwork.
    BottomTexture,
}

/// How transparent texture pixels become opaque before recoloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextureFill {
    /// Fully transparent pixels are replaced by the secondary color.
    #[default]
    ForceOpaque,
    /// The recolored texture is composited onto a secondary backdrop.
    PreComposite,
}

/// Placement constants of the card face, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardGeometry {
    pub width: u32,
    pub height: u32,
    pub corner_radius: u32,
    pub art_size: u32,
    pub scroll_width: u32,
    pub scroll_top: i64,
    pub flag_x: i64,
    pub flag_y: i64,
    pub flag_width: u32,
    pub flag_height: u32,
    pub badge_x: i64,
    pub badge_y: i64,
    pub badge_size: u32,
    pub badge_font_size: u32,
    pub label_font_size: u32,
    pub description_margin: u32,
    pub description_top: i64,
    pub chess_logo_size: u32,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            width: 750,
            height: 1050,
            corner_radius: 30,
            art_size: 750,
            scroll_width: 850,
            scroll_top: 10,
            flag_x: 40,
            flag_y: 110,
            flag_width: 90,
            flag_height: 330,
            badge_x: 15,
            badge_y: 15,
            badge_size: 150,
            badge_font_size: 72,
            label_font_size: 30,
            description_margin: 50,
            description_top: 775,
            chess_logo_size: 60,
        }
    }
}

impl CardGeometry {
    /// Width available to the description paragraph.
    pub fn description_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.description_margin)
    }

    /// Top of the decorated area under the artwork.
    pub fn bottom_top(&self) -> u32 {
        self.art_size.min(self.height)
    }
}

/// Everything the assembler needs, resolved once at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    pub title_font: PathBuf,
    pub body_font: PathBuf,
    pub number_font: PathBuf,
    /// Bold face for card names quoted in descriptions.
    pub emphasis_font: Option<PathBuf>,
    pub asset_root: PathBuf,
    pub style_table: StyleTable,
    pub layout: LayoutVariant,
    pub texture_fill: TextureFill,
    /// How far motif colors are pulled toward the secondary color.
    pub motif_blend: f32,
    pub geometry: CardGeometry,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            title_font: PathBuf::from("assets/fonts/title.ttf"),
            body_font: PathBuf::from("assets/fonts/body.ttf"),
            number_font: PathBuf::from("assets/fonts/number.ttf"),
            emphasis_font: None,
            asset_root: PathBuf::from("assets"),
            style_table: StyleTable::builtin(),
            layout: LayoutVariant::default(),
            texture_fill: TextureFill::default(),
            motif_blend: 0.8,
            geometry: CardGeometry::default(),
        }
    }
}

impl AssemblerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create config directory {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Resolve a decorative asset path against the asset root.
    pub fn asset(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.asset_root.join(relative)
    }
}
