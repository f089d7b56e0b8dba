//! Artgen CLI - generate character art, backgrounds and sprite sheets

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{art, balance, list, sprites, Context};

#[derive(Parser)]
#[command(name = "artgen")]
#[command(about = "Generate game art through AI image services", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with extra or replacement catalog entries
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Output root (defaults to the configured root, public/assets/images)
    #[arg(long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate character and background art
    Art {
        /// Asset to generate (see `artgen list`)
        #[arg(long = "type", value_name = "NAME")]
        asset_type: Option<String>,

        /// Generate every asset in the catalog
        #[arg(long, conflicts_with = "asset_type")]
        all: bool,
    },

    /// Generate pixel-art walk-cycle sprite sheets
    Sprites {
        /// Only this character (defaults to all sprite characters)
        #[arg(long)]
        name: Option<String>,

        /// Frame size in pixels
        #[arg(long)]
        size: Option<u32>,
    },

    /// Show the remaining sprite API balance
    Balance,

    /// List catalog entries
    List,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ctx = Context::load(cli.catalog.as_deref(), cli.output.as_deref())?;

    match cli.command {
        Commands::Art { asset_type, all } => art::run(&ctx, asset_type.as_deref(), all),
        Commands::Sprites { name, size } => sprites::run(&ctx, name.as_deref(), size),
        Commands::Balance => balance::run(&ctx),
        Commands::List => list::run(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_art_type_and_all_conflict() {
        assert!(Cli::try_parse_from(["artgen", "art", "--type", "tank", "--all"]).is_err());

        let cli = Cli::try_parse_from(["artgen", "art", "--type", "forest"]).unwrap();
        match cli.command {
            Commands::Art { asset_type, all } => {
                assert_eq!(asset_type.as_deref(), Some("forest"));
                assert!(!all);
            }
            _ => panic!("expected art command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["artgen", "sprites", "--size", "32", "--output", "out"]).unwrap();
        assert_eq!(cli.output.as_deref(), Some("out"));
        assert!(matches!(cli.command, Commands::Sprites { size: Some(32), .. }));
    }
}
