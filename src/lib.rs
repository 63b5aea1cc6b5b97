//! Core library for composing trading-card images from records and suit styles.

pub mod batch;
pub mod core;
pub mod image;

pub use crate::batch::{BatchReport, CardFailure, build_all, generate_all};
pub use crate::core::{
    AssemblerConfig, CardError, CardGeometry, CardRecord, CardResult, Color, LayoutVariant,
    StyleTable, SuitStyle, TextureFill, load_records, slugify,
};
pub use crate::image::{
    CardAssembler, CardBuilder, EmphasisSet, SheetLayout, SheetOptions, page_file_name,
    render_pages, save_card,
};
