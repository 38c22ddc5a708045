//! `remoto` — schema compiler front end.
//!
//! Parses a directory of `.remoto` files into a definition and prints it,
//! and lists the code-generation templates available.

mod config;
mod templates;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use config::{Format, RemotoConfig};
use templates::TemplateCatalog;

/// Remoto schema tool.
#[derive(Parser, Debug)]
#[command(name = "remoto", about = "Remoto service schema compiler")]
struct Cli {
    /// Path to config file (default: ./remoto.toml when present).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a schema directory and print the definition.
    Parse {
        /// Directory holding the .remoto files.
        dir: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// List the code-generation templates.
    Templates {
        /// Template root directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show version.
    Version,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let mut config = RemotoConfig::resolve(cli.config.as_deref(), &cwd)?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Parse { dir, format } => {
            config.apply(dir, None, format);
            let def = match remoto_parser::parse(&config.schema_dir) {
                Ok(def) => def,
                Err(err) => {
                    eprintln!("{}", err);
                    return Ok(ExitCode::FAILURE);
                }
            };
            info!(
                package = %def.package_name,
                services = def.services.len(),
                "parsed {}",
                config.schema_dir.display()
            );
            match config.format {
                Format::Text => print!("{}", def),
                Format::Json => println!("{}", serde_json::to_string_pretty(&def)?),
            }
        }

        Commands::Templates { dir } => {
            config.apply(None, dir, None);
            let catalog = TemplateCatalog::global(config.templates_dir);
            let names = catalog.list()?;
            info!(root = %catalog.root().display(), count = names.len(), "templates");
            for name in names {
                println!("{}", name);
            }
        }

        Commands::Version => {
            println!("remoto v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(ExitCode::SUCCESS)
}
