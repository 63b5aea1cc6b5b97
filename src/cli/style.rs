//! Suit style inspection commands (`cardsmith style ...`).

use std::path::PathBuf;

use anyhow::Result;
use cardsmith::{AssemblerConfig, StyleTable};
use clap::{Args, Subcommand};

/// Style subcommands.
#[derive(Subcommand, Debug)]
pub enum StyleCommand {
    /// List every known suit.
    List(StyleListArgs),
    /// Show colors and assets of one suit.
    Show(StyleShowArgs),
}

#[derive(Args, Debug)]
pub struct StyleListArgs {
    /// Read the style table from this configuration instead of the built-in one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for `cardsmith style show`.
#[derive(Args, Debug)]
pub struct StyleShowArgs {
    /// Suit name to display.
    pub suit: String,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute a style command.
pub fn handle(command: StyleCommand) -> Result<()> {
    match command {
        StyleCommand::List(args) => list(args),
        StyleCommand::Show(args) => show(args),
    }
}

fn style_table(config: Option<&PathBuf>) -> Result<StyleTable> {
    match config {
        Some(path) => Ok(AssemblerConfig::load(path)?.style_table),
        None => Ok(StyleTable::builtin()),
    }
}

fn list(args: StyleListArgs) -> Result<()> {
    let table = style_table(args.config.as_ref())?;
    println!("Available suits:");
    for style in table.list() {
        println!("  - {}: {} / {}", style.suit, style.primary, style.secondary);
    }
    Ok(())
}

fn show(args: StyleShowArgs) -> Result<()> {
    let table = style_table(args.config.as_ref())?;
    let style = table.get(&args.suit)?;
    println!("Suit: {}", style.suit);
    println!("  primary:   {}", style.primary);
    println!("  secondary: {}", style.secondary);
    println!("  texture:   {}", style.texture.display());
    println!("  logo:      {}", style.logo.display());
    Ok(())
}
