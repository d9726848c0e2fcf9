use crate::cli_args::Cli;
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::llm::{gemini, ollama, openai};

pub const DEFAULT_THEME: &str = "medieval";
pub const DEFAULT_DRAMA_LEVEL: u8 = 7;
pub const DRAMA_LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Which text-generation backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    Gemini,
    Openai,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Openai => "openai",
            Provider::Ollama => "ollama",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Openai => "gpt-4o-mini",
            Provider::Ollama => "llama3.2",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => gemini::DEFAULT_BASE_URL,
            Provider::Openai => openai::DEFAULT_BASE_URL,
            Provider::Ollama => ollama::DEFAULT_BASE_URL,
        }
    }

    /// Env var holding the API key, if the provider needs one.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::Gemini => Some("GOOGLE_API_KEY"),
            Provider::Openai => Some("OPENAI_API_KEY"),
            Provider::Ollama => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::Openai),
            "ollama" => Ok(Provider::Ollama),
            other => Err(anyhow!(
                "unknown provider '{other}' (expected gemini, openai or ollama)"
            )),
        }
    }
}

/// Final resolved configuration for epiclog.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base_url: String,
    /// Theme used when none is requested, and the fallback for unknown ones.
    pub default_theme: String,
    pub drama_level: u8,
    /// Parent of the `default/` and `custom/` theme directories.
    pub themes_root: PathBuf,
    /// Use the dummy client instead of a real backend.
    pub no_model: bool,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags
    ///   2. Env vars (`EPICLOG_*`, `DEFAULT_THEME`, `DEFAULT_DRAMA_LEVEL`, provider API key)
    ///   3. TOML `~/.config/epiclog.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = load_file_config().unwrap_or_default();
        Self::resolve(cli, |key| env::var(key).ok(), file_cfg)
    }

    fn resolve<E>(cli: &Cli, env_var: E, file_cfg: FileConfig) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let provider = match cli.provider {
            Some(p) => p,
            None => match env_var("EPICLOG_PROVIDER").or(file_cfg.provider) {
                Some(raw) => raw.parse()?,
                None => Provider::Gemini,
            },
        };

        let model = cli
            .model
            .clone()
            .or_else(|| env_var("EPICLOG_MODEL"))
            .or_else(|| env_var("DEFAULT_MODEL"))
            .or(file_cfg.model)
            .unwrap_or_else(|| provider.default_model().to_string());

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| provider.api_key_env().and_then(&env_var))
            .or(file_cfg.api_key)
            .filter(|k| !k.trim().is_empty());

        let api_base_url = cli
            .api_base_url
            .clone()
            .or_else(|| env_var("EPICLOG_API_BASE_URL"))
            .or(file_cfg.api_base_url)
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let default_theme = env_var("DEFAULT_THEME")
            .or(file_cfg.default_theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        let drama_level = match cli.drama_level {
            Some(level) => level,
            None => match env_var("DEFAULT_DRAMA_LEVEL") {
                Some(raw) => parse_drama_level(&raw).context("invalid DEFAULT_DRAMA_LEVEL")?,
                None => match file_cfg.drama_level {
                    Some(level) => check_drama_level(level).context("invalid drama_level in config file")?,
                    None => DEFAULT_DRAMA_LEVEL,
                },
            },
        };

        let themes_root = cli
            .themes_dir
            .clone()
            .or_else(|| env_var("EPICLOG_THEMES_DIR").map(PathBuf::from))
            .or(file_cfg.themes_dir)
            .unwrap_or_else(default_themes_root);

        let no_model = cli.no_model || model.eq_ignore_ascii_case("none");

        Ok(Config {
            provider,
            model,
            api_key,
            api_base_url,
            default_theme,
            drama_level,
            themes_root,
            no_model,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    provider: Option<String>,
    /// Default model to use when not provided via CLI or env.
    model: Option<String>,
    api_key: Option<String>,
    api_base_url: Option<String>,
    default_theme: Option<String>,
    drama_level: Option<i64>,
    themes_dir: Option<PathBuf>,
}

fn parse_drama_level(raw: &str) -> Result<u8> {
    let level: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a number"))?;
    check_drama_level(level)
}

fn check_drama_level(level: i64) -> Result<u8> {
    match u8::try_from(level) {
        Ok(level) if DRAMA_LEVEL_RANGE.contains(&level) => Ok(level),
        _ => bail!("drama level must be between 1 and 10, got {level}"),
    }
}

/// Return `~/.config/epiclog.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("epiclog.toml"))
}

/// `~/.config/epiclog/themes`, or `.epiclog/themes` when there is no home directory.
fn default_themes_root() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".config").join("epiclog").join("themes"),
        None => PathBuf::from(".epiclog").join("themes"),
    }
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring malformed config file {}: {e}", path.display());
            None
        }
    }
}
