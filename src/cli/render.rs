//! Rendering commands (`cardsmith render ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use cardsmith::image::canvas::load_rgba;
use cardsmith::{CardBuilder, SheetOptions, build_all, generate_all, page_file_name, render_pages, save_card};
use clap::{Args, Subcommand};
use tracing::info;

use crate::cli::common::{ConfigArgs, SheetLayoutArg};
use crate::cli::utils::{assembler_for, ensure_dir, load_config, read_records};

/// Available render subcommands.
#[derive(Subcommand, Debug)]
pub enum RenderCommand {
    /// Render one PNG per record.
    Cards(RenderCardsArgs),
    /// Render records and lay them out on printable A4 pages.
    Sheet(RenderSheetArgs),
}

/// Args for `cardsmith render cards`.
#[derive(Args, Debug)]
pub struct RenderCardsArgs {
    /// Record file (JSON array or JSON lines).
    pub records: PathBuf,
    /// Output directory, or a `.png` file when rendering a single record.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Only render the first N records.
    #[arg(long)]
    pub limit: Option<usize>,
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Args for `cardsmith render sheet`.
#[derive(Args, Debug)]
pub struct RenderSheetArgs {
    /// Record file (JSON array or JSON lines).
    pub records: PathBuf,
    /// Directory receiving `page_0001.png`, `page_0002.png`, ...
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Page arrangement.
    #[arg(long, default_value_t = SheetLayoutArg::Single, value_enum)]
    pub layout: SheetLayoutArg,
    /// Dots per inch used when rasterising pages.
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,
    /// Card back image, printed after the cards or on mirrored back pages.
    #[arg(long)]
    pub cover: Option<PathBuf>,
    /// Only lay out the first N records.
    #[arg(long)]
    pub limit: Option<usize>,
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute a render command.
pub fn handle(command: RenderCommand) -> Result<()> {
    match command {
        RenderCommand::Cards(args) => cards(args),
        RenderCommand::Sheet(args) => sheet(args),
    }
}

fn cards(args: RenderCardsArgs) -> Result<()> {
    let records = read_records(&args.records, args.limit)?;
    let config = load_config(&args.config)?;

    let output_path = args.output;
    let is_single_file_target = output_path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if records.len() > 1 && is_single_file_target {
        return Err(anyhow!(
            "output path must be a directory when rendering multiple cards"
        ));
    }

    let assembler = assembler_for(config, &records)?;

    if is_single_file_target {
        let record = records
            .first()
            .ok_or_else(|| anyhow!("{} holds no records", args.records.display()))?;
        let card = assembler
            .build(record)
            .with_context(|| format!("failed to build card '{}'", record.name))?;
        save_card(&card, &output_path)?;
        println!("Rendered card '{}' to {}", record.name, output_path.display());
        return Ok(());
    }

    ensure_dir(&output_path)?;
    let report = generate_all(&assembler, &records, &output_path);
    println!(
        "Rendered {} of {} card image(s) to {}",
        report.written.len(),
        report.total(),
        output_path.display()
    );
    for failure in &report.failed {
        println!("  skipped {}: {}", failure.name, failure.reason);
    }
    Ok(())
}

fn sheet(args: RenderSheetArgs) -> Result<()> {
    let records = read_records(&args.records, args.limit)?;
    let config = load_config(&args.config)?;
    let cover = args
        .cover
        .as_deref()
        .map(load_rgba)
        .transpose()
        .context("failed to load cover image")?;
    let assembler = assembler_for(config, &records)?;

    let (cards, failed) = build_all(&assembler, &records);
    let options = SheetOptions {
        layout: args.layout.into(),
        dpi: args.dpi,
        cover,
    };
    let pages = render_pages(&cards, &options);
    info!(pages = pages.len(), "laid out print pages");

    ensure_dir(&args.output)?;
    for (idx, page) in pages.iter().enumerate() {
        save_card(page, &args.output.join(page_file_name(idx + 1)))?;
    }

    println!(
        "Wrote {} page(s) for {} card(s) to {} at {} DPI",
        pages.len(),
        records.len() - failed.len(),
        args.output.display(),
        args.dpi.clamp(72, 1200)
    );
    for failure in &failed {
        println!("  skipped {}: {}", failure.name, failure.reason);
    }
    Ok(())
}
