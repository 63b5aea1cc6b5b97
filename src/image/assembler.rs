//! Per-record card assembly: layers first, then text, then the corner mask.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::core::config::{AssemblerConfig, LayoutVariant};
use crate::core::error::CardResult;
use crate::core::record::CardRecord;
use crate::core::style::{Color, SuitStyle};
use crate::image::canvas::{
    Layer, apply_mask, chess_pattern, load_rgba, new_canvas, resize_exact, resize_to_width,
    rounded_mask,
};
use crate::image::color::{AlphaPolicy, map_image, map_motif, recolor};
use crate::image::typography::{EmphasisSet, FontSizing, ParagraphFonts, Typeface, draw_paragraph};

pub const SCROLL_ASSET: &str = "scroll.png";
pub const FLAG_ASSET: &str = "flag.png";
pub const GLYPH_ASSET: &str = "glyph.png";

const TEXT_COLOR: Rgba<u8> = Rgba([20, 20, 20, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([60, 60, 60, 255]);
const BADGE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BADGE_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Anything that turns a record into a finished card image.
pub trait CardBuilder {
    fn build(&self, record: &CardRecord) -> CardResult<RgbaImage>;
}

/// What fills the area below the artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottomFill {
    Plain,
    Chess,
    Texture,
}

/// Policy flags behind a [`LayoutVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPolicy {
    pub bottom: BottomFill,
    pub numeric_badge: bool,
}

impl LayoutPolicy {
    pub fn for_variant(variant: LayoutVariant) -> Self {
        match variant {
            LayoutVariant::ClassicScroll => Self {
                bottom: BottomFill::Plain,
                numeric_badge: false,
            },
            LayoutVariant::ChessTexture => Self {
                bottom: BottomFill::Chess,
                numeric_badge: true,
            },
            LayoutVariant::BottomTexture => Self {
                bottom: BottomFill::Texture,
                numeric_badge: true,
            },
        }
    }
}

/// The card after every bitmap layer has been pasted, before any text.
#[derive(Debug, Clone)]
pub struct Composition {
    pub canvas: RgbaImage,
    /// Vertical extent of the scroll banner as `(top, height)`.
    pub scroll_band: (i64, u32),
}

/// Paste the bitmap layers under the text in their fixed order: base, bottom
/// decoration, artwork, scroll and flag.
pub fn compose_layers(
    config: &AssemblerConfig,
    record: &CardRecord,
    style: &SuitStyle,
) -> CardResult<Composition> {
    let geometry = &config.geometry;
    let policy = LayoutPolicy::for_variant(config.layout);

    let art_path = record.resolve_character_image()?;
    let art = load_rgba(&art_path)?;

    let mut canvas = new_canvas(geometry.width, geometry.height, geometry.corner_radius);

    if let Some(bottom) = bottom_layer(config, record, style, policy.bottom)? {
        bottom.paste_onto(&mut canvas);
    }

    let art = resize_exact(&art, geometry.art_size, geometry.art_size);
    let art_x = (i64::from(geometry.width) - i64::from(geometry.art_size)) / 2;
    Layer::new(art, art_x, 0).paste_onto(&mut canvas);

    let scroll = resize_to_width(&load_rgba(&config.asset(SCROLL_ASSET))?, geometry.scroll_width);
    let scroll_x = (i64::from(geometry.width) - i64::from(geometry.scroll_width)) / 2;
    let scroll_band = (geometry.scroll_top, scroll.height());
    Layer::new(scroll, scroll_x, geometry.scroll_top).paste_onto(&mut canvas);

    let flag = resize_exact(
        &load_rgba(&config.asset(FLAG_ASSET))?,
        geometry.flag_width,
        geometry.flag_height,
    );
    let flag = recolor(&flag, style.primary, Color::WHITE);
    Layer::new(flag, geometry.flag_x, geometry.flag_y).paste_onto(&mut canvas);

    Ok(Composition {
        canvas,
        scroll_band,
    })
}

/// The badge glyph, for layouts that carry a points badge. It goes on top of
/// the suit label.
pub fn badge_layer(config: &AssemblerConfig) -> CardResult<Option<Layer>> {
    let geometry = &config.geometry;
    if !LayoutPolicy::for_variant(config.layout).numeric_badge {
        return Ok(None);
    }
    let glyph = resize_exact(
        &load_rgba(&config.asset(GLYPH_ASSET))?,
        geometry.badge_size,
        geometry.badge_size,
    );
    Ok(Some(Layer::new(glyph, geometry.badge_x, geometry.badge_y)))
}

fn bottom_layer(
    config: &AssemblerConfig,
    record: &CardRecord,
    style: &SuitStyle,
    fill: BottomFill,
) -> CardResult<Option<Layer>> {
    let geometry = &config.geometry;
    let top = geometry.bottom_top();
    let height = geometry.height.saturating_sub(top);
    if height == 0 {
        return Ok(None);
    }
    let image = match fill {
        BottomFill::Plain => return Ok(None),
        BottomFill::Chess => {
            let logo_path = record
                .logo_image_path
                .clone()
                .unwrap_or_else(|| config.asset(&style.logo));
            let logo = resize_exact(
                &load_rgba(&logo_path)?,
                geometry.chess_logo_size,
                geometry.chess_logo_size,
            );
            let logo = map_motif(&logo, style.primary, style.secondary, config.motif_blend);
            chess_pattern(geometry.width, height, &logo, style.secondary)
        }
        BottomFill::Texture => {
            let texture = resize_exact(&load_rgba(&config.asset(&style.texture))?, geometry.width, height);
            map_image(
                &texture,
                style.primary,
                style.secondary,
                AlphaPolicy::Opaque(config.texture_fill),
            )
        }
    };
    Ok(Some(Layer::new(image, 0, i64::from(top))))
}

/// Clip the finished card to its rounded outline.
pub fn finish(canvas: &mut RgbaImage, config: &AssemblerConfig) {
    let geometry = &config.geometry;
    let mask = rounded_mask(geometry.width, geometry.height, geometry.corner_radius);
    apply_mask(canvas, &mask);
}

struct CardFonts {
    title: Typeface,
    body: Typeface,
    number: Typeface,
    emphasis: Option<Typeface>,
}

/// Builds finished card images from records.
///
/// Fonts are loaded once when the assembler is created; every other asset is
/// read again for each card.
pub struct CardAssembler {
    config: AssemblerConfig,
    fonts: CardFonts,
    emphasis: EmphasisSet,
}

impl std::fmt::Debug for CardAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardAssembler")
            .field("layout", &self.config.layout)
            .field("asset_root", &self.config.asset_root)
            .finish()
    }
}

impl CardAssembler {
    pub fn new(config: AssemblerConfig) -> CardResult<Self> {
        let fonts = CardFonts {
            title: Typeface::load(&config.title_font)?,
            body: Typeface::load(&config.body_font)?,
            number: Typeface::load(&config.number_font)?,
            emphasis: config.emphasis_font.as_deref().map(Typeface::load).transpose()?,
        };
        Ok(Self {
            config,
            fonts,
            emphasis: EmphasisSet::default(),
        })
    }

    /// Draw these names with the emphasis face wherever a description quotes them.
    pub fn with_emphasis(mut self, emphasis: EmphasisSet) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Build a card against an already resolved style.
    #[tracing::instrument(skip_all, fields(card = %record.name, suit = %style.suit))]
    pub fn build_with_style(&self, record: &CardRecord, style: &SuitStyle) -> CardResult<RgbaImage> {
        let geometry = &self.config.geometry;
        let Composition {
            mut canvas,
            scroll_band,
        } = compose_layers(&self.config, record, style)?;

        let label = self
            .fonts
            .body
            .at(geometry.label_font_size)
            .rotated_label(&record.suit, LABEL_COLOR);
        let label_x = geometry.flag_x + i64::from(geometry.flag_width / 2) - i64::from(label.width() / 2);
        let label_y = geometry.flag_y + i64::from(geometry.flag_height / 2) - i64::from(label.height() / 2);
        Layer::new(label, label_x, label_y).paste_onto(&mut canvas);

        if let Some(glyph) = badge_layer(&self.config)? {
            glyph.paste_onto(&mut canvas);
            let center = (
                geometry.badge_x as f32 + geometry.badge_size as f32 / 2.0,
                geometry.badge_y as f32 + geometry.badge_size as f32 / 2.0,
            );
            self.fonts.number.at(geometry.badge_font_size).draw_outlined(
                &mut canvas,
                &record.points.to_string(),
                center,
                BADGE_FILL,
                BADGE_OUTLINE,
            );
        }

        let title_size = FontSizing::TITLE.size_for(&record.name);
        let title_center = (
            geometry.width as f32 / 2.0,
            scroll_band.0 as f32 + scroll_band.1 as f32 / 2.0,
        );
        self.fonts
            .title
            .at(title_size)
            .draw_centered(&mut canvas, &record.name, title_center, TEXT_COLOR);

        let description = record.normalized_description();
        let body_size = FontSizing::DESCRIPTION.size_for(&description);
        let fonts = ParagraphFonts {
            regular: self.fonts.body.at(body_size),
            emphasis: self.fonts.emphasis.as_ref().map(|face| face.at(body_size)),
        };
        let words = self.emphasis.split(&description);
        let lines = draw_paragraph(
            &mut canvas,
            &words,
            (geometry.description_margin as i32, geometry.description_top as i32),
            geometry.description_width(),
            body_size,
            &fonts,
            TEXT_COLOR,
        );
        debug!(title_size, body_size, lines, "text laid out");

        finish(&mut canvas, &self.config);
        Ok(canvas)
    }
}

impl CardBuilder for CardAssembler {
    fn build(&self, record: &CardRecord) -> CardResult<RgbaImage> {
        let style = self.config.style_table.get(&record.suit)?;
        self.build_with_style(record, style)
    }
}

/// Write a card as PNG, creating parent directories as needed.
pub fn save_card(card: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {}", parent.display()))?;
        }
    }
    card.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Default output location of a record's card inside `dir`.
pub fn card_output_path(dir: &Path, record: &CardRecord) -> PathBuf {
    dir.join(format!("{}.png", record.slug()))
}
