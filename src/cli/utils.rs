//! Convenience helpers shared across command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cardsmith::{AssemblerConfig, CardAssembler, CardRecord, EmphasisSet, load_records};

use crate::cli::common::ConfigArgs;

/// Resolve the assembler configuration: file first, then flag overrides.
pub fn load_config(args: &ConfigArgs) -> Result<AssemblerConfig> {
    let mut config = match &args.config {
        Some(path) => AssemblerConfig::load(path)?,
        None => AssemblerConfig::default(),
    };
    if let Some(assets) = &args.assets {
        config.asset_root = assets.clone();
    }
    if let Some(variant) = args.variant {
        config.layout = variant.into();
    }
    if let Some(fill) = args.texture_fill {
        config.texture_fill = fill.into();
    }
    if let Some(font) = &args.title_font {
        config.title_font = font.clone();
    }
    if let Some(font) = &args.body_font {
        config.body_font = font.clone();
    }
    if let Some(font) = &args.number_font {
        config.number_font = font.clone();
    }
    if let Some(font) = &args.emphasis_font {
        config.emphasis_font = Some(font.clone());
    }
    Ok(config)
}

/// Load a record file, attaching path context to any error.
pub fn read_records(path: &Path, limit: Option<usize>) -> Result<Vec<CardRecord>> {
    let mut records =
        load_records(path).with_context(|| format!("failed to read records {}", path.display()))?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(records)
}

/// Assembler for a record set, emphasizing every card name of the batch.
pub fn assembler_for(config: AssemblerConfig, records: &[CardRecord]) -> Result<CardAssembler> {
    let emphasis = EmphasisSet::from_names(records.iter().map(|r| r.name.as_str()));
    let assembler = CardAssembler::new(config).context("failed to load card fonts")?;
    Ok(assembler.with_emphasis(emphasis))
}

/// Create `dir` and its parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::common::{LayoutArg, TextureFillArg};
    use cardsmith::{LayoutVariant, TextureFill};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn flags_override_defaults() {
        let args = ConfigArgs {
            assets: Some(PathBuf::from("art")),
            variant: Some(LayoutArg::BottomTexture),
            texture_fill: Some(TextureFillArg::PreComposite),
            emphasis_font: Some(PathBuf::from("bold.ttf")),
            ..ConfigArgs::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("art"));
        assert_eq!(config.layout, LayoutVariant::BottomTexture);
        assert_eq!(config.texture_fill, TextureFill::PreComposite);
        assert_eq!(config.emphasis_font, Some(PathBuf::from("bold.ttf")));
        assert_eq!(config.title_font, AssemblerConfig::default().title_font);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/cardsmith.json")),
            ..ConfigArgs::default()
        };
        assert!(load_config(&args).is_err());
    }
}
