//! Command-line interface wiring for the `cardsmith` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod config;
pub mod render;
pub mod style;
pub mod utils;

/// Parsed CLI entrypoint for the `cardsmith` binary.
#[derive(Parser, Debug)]
#[command(name = "cardsmith", version, about = "Trading-card compositor and print sheet generator")]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Render(render::RenderCommand),
    #[command(subcommand)]
    Style(style::StyleCommand),
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(cmd) => render::handle(cmd),
        Command::Style(cmd) => style::handle(cmd),
        Command::Config(cmd) => config::handle(cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sheet_command() {
        let cli = Cli::try_parse_from([
            "cardsmith", "render", "sheet", "cards.jsonl", "-o", "out", "--layout", "home", "--dpi",
            "150",
        ])
        .unwrap();
        match cli.command {
            Command::Render(render::RenderCommand::Sheet(args)) => {
                assert_eq!(args.dpi, 150);
                assert!(matches!(args.layout, common::SheetLayoutArg::Home));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
