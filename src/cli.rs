use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "handoff",
    version,
    about = "Extract design tokens, component variants and assets from a Figma file"
)]
pub struct Cli {
    /// Path to a handoff.toml config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging on stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the Figma file and write tokens, assets, CSS and the changelog
    Fetch {
        /// Figma file id (overrides config and HANDOFF_FIGMA_PROJECT_ID)
        #[arg(long)]
        project_id: Option<String>,

        /// Figma access token (overrides HANDOFF_DEV_ACCESS_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Directory for generated files (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory holding exportable definitions (overrides config)
        #[arg(long)]
        exportables: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the command output here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Changelog between two tokens.json snapshots
    Diff {
        #[arg(long)]
        prev: PathBuf,

        #[arg(long)]
        new: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Regenerate tokens.css and tokens.scss from a tokens.json
    Transform {
        #[arg(long)]
        input: PathBuf,

        /// Directory for tokens.css/tokens.scss (defaults to the input's directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory holding exportable definitions (overrides config)
        #[arg(long)]
        exportables: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
