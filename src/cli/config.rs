//! Configuration commands (`cardsmith config ...`).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use cardsmith::AssemblerConfig;
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the default configuration as JSON.
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Destination file.
    pub path: PathBuf,
    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

/// Execute a config command.
pub fn handle(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init(args) => init(args),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        ));
    }
    AssemblerConfig::default().save(&args.path)?;
    println!("Wrote default configuration to {}", args.path.display());
    Ok(())
}
