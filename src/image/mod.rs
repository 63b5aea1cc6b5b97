//! Pixel work: color mapping, layer compositing, text and card assembly.

pub mod assembler;
pub mod canvas;
pub mod color;
pub mod sheet;
pub mod typography;

pub use assembler::{CardAssembler, CardBuilder, LayoutPolicy, card_output_path, save_card};
pub use color::{AlphaPolicy, map_color, map_image, map_motif, recolor};
pub use sheet::{SheetLayout, SheetOptions, page_file_name, render_pages};
pub use typography::{EmphasisSet, FontSizing, adaptive_font_size};
