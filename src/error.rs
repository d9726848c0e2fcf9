use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the theme registry and the chronicler can report.
#[derive(Debug, Error)]
pub enum EpicError {
    /// The definition file could not be read or is not well-formed JSON.
    #[error("could not parse theme file {}: {message}", .path.display())]
    ThemeParse { path: PathBuf, message: String },

    /// Well-formed, but a required field is missing, empty or mistyped.
    #[error("invalid theme definition in {}: {reason}", .path.display())]
    ThemeValidation { path: PathBuf, reason: String },

    #[error("theme '{0}' not found")]
    ThemeNotFound(String),

    /// Anything that went wrong talking to the model backend.
    #[error("⚠️ Failed to summon the epic transformation: {0}")]
    GenerationBackend(String),

    #[error("could not access {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse failure class, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Validation,
    NotFound,
    Backend,
    Persistence,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Parse => "parse",
            ErrorCategory::Validation => "validation",
            ErrorCategory::NotFound => "not-found",
            ErrorCategory::Backend => "backend",
            ErrorCategory::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EpicError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EpicError::ThemeParse { .. } => ErrorCategory::Parse,
            EpicError::ThemeValidation { .. } => ErrorCategory::Validation,
            EpicError::ThemeNotFound(_) => ErrorCategory::NotFound,
            EpicError::GenerationBackend(_) => ErrorCategory::Backend,
            EpicError::Persistence { .. } => ErrorCategory::Persistence,
        }
    }

    pub(crate) fn validation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EpicError::ThemeValidation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EpicError::Persistence {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_carry_fixed_prefix() {
        let err = EpicError::GenerationBackend("HTTP 429 - quota exceeded".into());
        let msg = err.to_string();
        assert!(msg.starts_with("⚠️ Failed to summon the epic transformation: "));
        assert!(msg.ends_with("HTTP 429 - quota exceeded"));
        assert_eq!(err.category(), ErrorCategory::Backend);
    }

    #[test]
    fn categories_are_distinct_per_variant() {
        let errors = [
            EpicError::ThemeParse {
                path: "a.json".into(),
                message: "expected value".into(),
            },
            EpicError::validation("b.json", "missing `tone`"),
            EpicError::ThemeNotFound("pirate".into()),
            EpicError::GenerationBackend("timeout".into()),
            EpicError::persistence(
                "c.json",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ),
        ];

        let labels: Vec<&str> = errors.iter().map(|e| e.category().as_str()).collect();
        assert_eq!(
            labels,
            ["parse", "validation", "not-found", "backend", "persistence"]
        );
    }
}
