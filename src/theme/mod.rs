pub mod bundled;
pub mod registry;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EpicError;

pub use registry::{ThemeDirs, ThemeRegistry, ThemesBySource};

/// Extension of files the registry picks up when scanning a directory.
pub const THEME_FILE_EXTENSION: &str = "json";

/// Stem suffix stripped when a file does not carry an explicit `name`.
pub const THEME_STEM_SUFFIX: &str = "_theme";

/// Shown when a theme does not configure its own emoji.
pub const FALLBACK_EMOJI: &str = "🎭";

/// Where a theme was loaded from. Custom themes win on name collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeSource {
    Default,
    Custom,
}

impl ThemeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeSource::Default => "default",
            ThemeSource::Custom => "custom",
        }
    }
}

/// A validated theme. Only constructed through [`ThemeDefinition::into_theme`],
/// so vocabulary, metaphors and tone are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub vocabulary: Vec<String>,
    pub metaphors: Vec<String>,
    pub tone: String,
    pub source: ThemeSource,
}

impl Theme {
    pub fn emoji_or_fallback(&self) -> &str {
        self.emoji
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(FALLBACK_EMOJI)
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// On-disk shape of a theme file. Every key is optional here so that
/// validation can report which one is missing; unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaphors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ThemeDefinition {
    /// Parse raw file contents. `path` is only used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, EpicError> {
        let value: Value = serde_json::from_str(contents).map_err(|e| EpicError::ThemeParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !value.is_object() {
            return Err(EpicError::validation(
                path,
                "top level must be a JSON object",
            ));
        }

        serde_json::from_value(value).map_err(|e| EpicError::validation(path, e.to_string()))
    }

    /// Validate required fields and resolve the registry key.
    ///
    /// The key is the explicit `name` when present, otherwise the file stem
    /// with any `_theme` suffix removed. Keys are always lowercase.
    pub fn into_theme(self, path: &Path, source: ThemeSource) -> Result<Theme, EpicError> {
        let vocabulary = match self.vocabulary {
            Some(words) if !words.is_empty() => words,
            Some(_) => return Err(EpicError::validation(path, "`vocabulary` is empty")),
            None => return Err(EpicError::validation(path, "missing `vocabulary`")),
        };

        let metaphors = match self.metaphors {
            Some(items) if !items.is_empty() => items,
            Some(_) => return Err(EpicError::validation(path, "`metaphors` is empty")),
            None => return Err(EpicError::validation(path, "missing `metaphors`")),
        };

        let tone = match self.tone {
            Some(tone) if !tone.trim().is_empty() => tone,
            Some(_) => return Err(EpicError::validation(path, "`tone` is blank")),
            None => return Err(EpicError::validation(path, "missing `tone`")),
        };

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .or_else(|| name_from_path(path))
            .ok_or_else(|| EpicError::validation(path, "cannot derive a theme name"))?
            .to_lowercase();

        Ok(Theme {
            name,
            display_name: self.display_name,
            description: self.description,
            emoji: self.emoji,
            vocabulary,
            metaphors,
            tone,
            source,
        })
    }

    /// Placeholder definition written by `create_template`.
    pub fn template(name: &str) -> Self {
        let numbered = |prefix: &str, count: usize| -> Vec<String> {
            (1..=count).map(|i| format!("{prefix}{i}")).collect()
        };

        ThemeDefinition {
            name: Some(theme_slug(name).unwrap_or_else(|| name.trim().to_lowercase())),
            display_name: Some(format!("{} Theme", title_case(name))),
            vocabulary: Some(numbered("word", 10)),
            metaphors: Some(numbered("metaphor", 8)),
            tone: Some("describe your theme's tone here".to_string()),
            emoji: Some(FALLBACK_EMOJI.to_string()),
            description: Some("Describe what this theme does".to_string()),
        }
    }
}

/// Read, parse and validate a single theme file.
pub fn load_theme_file(path: &Path, source: ThemeSource) -> Result<Theme, EpicError> {
    let contents = fs::read_to_string(path).map_err(|e| EpicError::ThemeParse {
        path: path.to_path_buf(),
        message: format!("could not read file: {e}"),
    })?;

    ThemeDefinition::parse(&contents, path)?.into_theme(path, source)
}

/// File stem with the `_theme` suffix stripped, e.g. `space_theme.json` -> `space`.
pub fn name_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = stem.strip_suffix(THEME_STEM_SUFFIX).unwrap_or(stem).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Lowercase identifier safe for file names, e.g. `Deep Sea` -> `deep_sea`.
/// Returns `None` when nothing usable is left of the name.
pub fn theme_slug(name: &str) -> Option<String> {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let slug = slug.trim_matches('_');

    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

/// Canonical file name for a theme, e.g. `Deep Sea` -> `deep_sea_theme.json`.
pub fn canonical_file_name(name: &str) -> Option<String> {
    theme_slug(name).map(|slug| format!("{slug}{THEME_STEM_SUFFIX}.{THEME_FILE_EXTENSION}"))
}

fn title_case(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Theme, EpicError> {
        let path = Path::new("dragons_theme.json");
        ThemeDefinition::parse(json, path)?.into_theme(path, ThemeSource::Default)
    }

    #[test]
    fn name_falls_back_to_file_stem() {
        let theme = parse(r#"{"vocabulary":["a"],"metaphors":["b"],"tone":"grim"}"#).unwrap();
        assert_eq!(theme.name, "dragons");
        assert_eq!(theme.source, ThemeSource::Default);
    }

    #[test]
    fn explicit_name_is_lowercased() {
        let theme =
            parse(r#"{"name":" Pirate ","vocabulary":["a"],"metaphors":["b"],"tone":"salty"}"#)
                .unwrap();
        assert_eq!(theme.name, "pirate");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let theme = parse(
            r#"{"vocabulary":["a"],"metaphors":["b"],"tone":"t","author":"me","version":2}"#,
        )
        .unwrap();
        assert_eq!(theme.vocabulary, vec!["a"]);
    }

    #[test]
    fn missing_or_empty_fields_are_validation_errors() {
        for json in [
            r#"{"metaphors":["b"],"tone":"t"}"#,
            r#"{"vocabulary":["a"],"tone":"t"}"#,
            r#"{"vocabulary":["a"],"metaphors":["b"]}"#,
            r#"{"vocabulary":[],"metaphors":["b"],"tone":"t"}"#,
            r#"{"vocabulary":["a"],"metaphors":["b"],"tone":"   "}"#,
            r#"{"vocabulary":"a","metaphors":["b"],"tone":"t"}"#,
            r#"["vocabulary"]"#,
        ] {
            let err = parse(json).unwrap_err();
            assert_eq!(err.category(), crate::error::ErrorCategory::Validation, "{json}");
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse(r#"{"vocabulary": ["a",}"#).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Parse);
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_file_name("Deep Sea").as_deref(), Some("deep_sea_theme.json"));
        assert_eq!(canonical_file_name("noir").as_deref(), Some("noir_theme.json"));
        assert_eq!(canonical_file_name(" / "), None);
        assert_eq!(name_from_path(Path::new("x/space_theme.json")).as_deref(), Some("space"));
        assert_eq!(name_from_path(Path::new("x/pirates.json")).as_deref(), Some("pirates"));
    }

    #[test]
    fn template_is_a_valid_theme() {
        let theme = ThemeDefinition::template("Deep Sea")
            .into_theme(Path::new("deep_sea_theme.json"), ThemeSource::Custom)
            .unwrap();
        assert_eq!(theme.name, "deep_sea");
        assert_eq!(theme.label(), "Deep Sea Theme");
        assert_eq!(theme.vocabulary.len(), 10);
        assert_eq!(theme.metaphors.len(), 8);
    }
}
