//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use cardsmith::{LayoutVariant, SheetLayout, TextureFill};
use clap::{Args, ValueEnum};

/// Card layout variants accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    ClassicScroll,
    ChessTexture,
    BottomTexture,
}

impl From<LayoutArg> for LayoutVariant {
    fn from(value: LayoutArg) -> LayoutVariant {
        match value {
            LayoutArg::ClassicScroll => LayoutVariant::ClassicScroll,
            LayoutArg::ChessTexture => LayoutVariant::ChessTexture,
            LayoutArg::BottomTexture => LayoutVariant::BottomTexture,
        }
    }
}

/// How transparent texture pixels are filled.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TextureFillArg {
    ForceOpaque,
    PreComposite,
}

impl From<TextureFillArg> for TextureFill {
    fn from(value: TextureFillArg) -> TextureFill {
        match value {
            TextureFillArg::ForceOpaque => TextureFill::ForceOpaque,
            TextureFillArg::PreComposite => TextureFill::PreComposite,
        }
    }
}

/// Print sheet layouts.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SheetLayoutArg {
    Single,
    Home,
}

impl From<SheetLayoutArg> for SheetLayout {
    fn from(value: SheetLayoutArg) -> SheetLayout {
        match value {
            SheetLayoutArg::Single => SheetLayout::Single,
            SheetLayoutArg::Home => SheetLayout::Home,
        }
    }
}

/// Configuration flags shared by every command that builds cards.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON configuration file (defaults apply when omitted).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory holding decorative assets, suit textures and logos.
    #[arg(long)]
    pub assets: Option<PathBuf>,
    /// Card layout variant.
    #[arg(long, value_enum)]
    pub variant: Option<LayoutArg>,
    /// Fill policy for transparent texture pixels.
    #[arg(long = "texture-fill", value_enum)]
    pub texture_fill: Option<TextureFillArg>,
    /// Font used for card titles.
    #[arg(long = "title-font")]
    pub title_font: Option<PathBuf>,
    /// Font used for the suit label and descriptions.
    #[arg(long = "body-font")]
    pub body_font: Option<PathBuf>,
    /// Font used for the points badge.
    #[arg(long = "number-font")]
    pub number_font: Option<PathBuf>,
    /// Bold font for card names quoted inside descriptions.
    #[arg(long = "emphasis-font")]
    pub emphasis_font: Option<PathBuf>,
}
