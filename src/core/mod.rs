//! Core domain primitives: card records, suit styles, configuration and errors.

pub mod config;
pub mod error;
pub mod record;
pub mod style;

pub use config::{AssemblerConfig, CardGeometry, LayoutVariant, TextureFill};
pub use error::{CardError, CardResult};
pub use record::{CardRecord, load_records, parse_record_array, slugify};
pub use style::{Color, StyleTable, SuitStyle};
