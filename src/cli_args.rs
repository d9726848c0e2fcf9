use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::Provider;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "epiclog",
    version,
    about = "Transform boring changelog entries into EPIC narratives"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
#[command(group(
    ArgGroup::new("theme_admin")
        .args(["list_themes", "create_theme", "add_theme"])
        .multiple(false)
))]
pub struct Cli {
    /// Changelog entry to transform
    pub text: Option<String>,

    /// Drama level from 1 (mild) to 10 (maximum)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub drama_level: Option<u8>,

    /// Theme to narrate in (see --list-themes)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Model name to use (e.g. gemini-2.0-flash). If 'none', acts like --no-model.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Disable model calls; return dummy responses instead
    #[arg(long)]
    pub no_model: bool,

    /// Generation backend
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// API key (otherwise uses GOOGLE_API_KEY or OPENAI_API_KEY, depending on provider)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the backend base URL (e.g. a self-hosted OpenAI-compatible server)
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Process a file with one changelog entry per line
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Save the epic transformations to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Interactive mode: transform entries until an empty line
    #[arg(short, long)]
    pub interactive: bool,

    /// List all available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Create a custom theme template with the given name and exit
    #[arg(long, value_name = "NAME")]
    pub create_theme: Option<String>,

    /// Add a custom theme from a JSON file and exit
    #[arg(long, value_name = "PATH")]
    pub add_theme: Option<PathBuf>,

    /// With --add-theme: only load the theme for this run, do not copy it
    #[arg(long, requires = "add_theme")]
    pub session_only: bool,

    /// Directory holding the `default/` and `custom/` theme folders
    #[arg(long, value_name = "DIR")]
    pub themes_dir: Option<PathBuf>,

    /// Skip the banner
    #[arg(long)]
    pub no_banner: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
