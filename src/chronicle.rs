use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{debug, warn};

use crate::error::EpicError;
use crate::llm::LlmClient;
use crate::llm::prompt_builder;
use crate::theme::ThemeRegistry;

/// One transformed changelog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chronicle {
    pub original: String,
    pub epic: String,
}

impl fmt::Display for Chronicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original: {}", self.original)?;
        writeln!(f, "Epic: {}", self.epic)
    }
}

/// Turns plain changelog text into epic narratives: theme lookup, request
/// building, the backend call and post-processing.
pub struct Chronicler<'a> {
    registry: &'a ThemeRegistry,
    client: &'a dyn LlmClient,
}

impl<'a> Chronicler<'a> {
    pub fn new(registry: &'a ThemeRegistry, client: &'a dyn LlmClient) -> Self {
        Chronicler { registry, client }
    }

    pub fn transform(&self, text: &str, level: u8, theme: &str) -> Result<String, EpicError> {
        let theme = self.registry.require(theme)?;
        let request = prompt_builder::build(theme, level, text);

        debug!(
            "Generation request: theme={}, level={level}, max_output_tokens={}, temperature={}",
            theme.name, request.max_output_tokens, request.temperature
        );

        let raw = self
            .client
            .generate(&request)
            .map_err(|e| EpicError::GenerationBackend(format!("{e:#}")))?;

        if raw.trim().is_empty() {
            return Err(EpicError::GenerationBackend("empty response".into()));
        }

        Ok(prompt_builder::postprocess(&raw, theme))
    }

    /// Transform every non-blank line of a changelog file. A failing entry
    /// records its error message as the epic text; the rest still run.
    pub fn process_file(
        &self,
        path: &Path,
        level: u8,
        theme: &str,
    ) -> anyhow::Result<Vec<Chronicle>> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("the sacred scroll {} could not be read", path.display()))?;

        let chronicles = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let epic = self.transform(line, level, theme).unwrap_or_else(|e| {
                    warn!("Entry {line:?} failed ({}): {e}", e.category());
                    e.to_string()
                });
                Chronicle {
                    original: line.to_string(),
                    epic,
                }
            })
            .collect();

        Ok(chronicles)
    }
}

/// Write all transformations of a run to `path`, replacing any existing file.
pub fn save_chronicles(
    path: &Path,
    theme: &str,
    level: u8,
    chronicles: &[Chronicle],
) -> Result<(), EpicError> {
    let mut out = String::from("# Epic Changelog Transformations\n\n");
    out.push_str(&format!("Theme: {theme} | Drama Level: {level}\n\n"));
    for chronicle in chronicles {
        out.push_str(&chronicle.to_string());
        out.push('\n');
    }

    fs::write(path, out).map_err(|e| EpicError::persistence(path, e))
}
