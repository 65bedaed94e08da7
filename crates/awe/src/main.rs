//! awe - build and preview the awe in everything essay site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "awe")]
#[command(about = "Build and preview the awe in everything essay site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a site.toml and a sample essay
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,

        /// Include draft essays
        #[arg(long)]
        drafts: bool,
    },

    /// Preview the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Dev { port, no_open } => {
            commands::dev::run(&cli.config, port, !no_open).await?;
        }
        Commands::Build {
            output,
            no_minify,
            drafts,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            let drafts = if drafts { Some(true) } else { None };
            commands::build::run(&cli.config, output, minify, drafts).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build_flags() {
        let cli = Cli::parse_from(["awe", "build", "--no-minify", "--drafts", "-o", "public"]);

        assert_eq!(cli.config, PathBuf::from("site.toml"));
        match cli.command {
            Commands::Build {
                output,
                no_minify,
                drafts,
            } => {
                assert_eq!(output, Some(PathBuf::from("public")));
                assert!(no_minify);
                assert!(drafts);
            }
            _ => panic!("Expected build command"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["awe", "dev", "--config", "blog/site.toml", "--verbose"]);

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("blog/site.toml"));
        assert!(matches!(cli.command, Commands::Dev { port: 4321, no_open: false }));
    }
}
