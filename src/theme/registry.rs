use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::{
    THEME_FILE_EXTENSION, Theme, ThemeDefinition, ThemeSource, canonical_file_name,
    load_theme_file,
};
use crate::error::EpicError;

/// The two storage locations the registry reads from. Only `custom_dir` is
/// ever written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDirs {
    pub default_dir: PathBuf,
    pub custom_dir: PathBuf,
}

impl ThemeDirs {
    /// `<root>/default` and `<root>/custom`.
    pub fn under(root: &Path) -> Self {
        ThemeDirs {
            default_dir: root.join("default"),
            custom_dir: root.join("custom"),
        }
    }
}

/// Theme names split by provenance, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemesBySource {
    pub default: Vec<String>,
    pub custom: Vec<String>,
}

/// All themes available to this process, keyed by lowercase name.
///
/// Built once by [`ThemeRegistry::load`]; defaults are read first and custom
/// themes second, so a custom theme replaces a default one of the same name.
/// A replaced entry keeps its original position in [`list_names`](Self::list_names).
#[derive(Debug)]
pub struct ThemeRegistry {
    dirs: ThemeDirs,
    themes: Vec<Theme>,
    index: HashMap<String, usize>,
    problems: Vec<EpicError>,
}

impl ThemeRegistry {
    /// Scan both directories and build the registry.
    ///
    /// Never fails as a whole: unreadable or invalid files are logged, kept in
    /// [`problems`](Self::problems) and skipped. Missing directories are created.
    pub fn load(dirs: ThemeDirs) -> Self {
        let mut registry = ThemeRegistry {
            dirs,
            themes: Vec::new(),
            index: HashMap::new(),
            problems: Vec::new(),
        };

        let sources = [
            (registry.dirs.default_dir.clone(), ThemeSource::Default),
            (registry.dirs.custom_dir.clone(), ThemeSource::Custom),
        ];
        for (dir, source) in sources {
            registry.load_dir(&dir, source);
        }

        if registry.themes.is_empty() {
            warn!(
                "No themes found in {} or {}",
                registry.dirs.default_dir.display(),
                registry.dirs.custom_dir.display()
            );
        }

        registry
    }

    fn load_dir(&mut self, dir: &Path, source: ThemeSource) {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(()) => info!("Created {} theme directory {}", source.as_str(), dir.display()),
                Err(e) => {
                    warn!("Could not create theme directory {}: {e}", dir.display());
                    self.problems.push(EpicError::persistence(dir, e));
                }
            }
            return;
        }

        let files = match theme_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Could not list theme directory {}: {e}", dir.display());
                self.problems.push(EpicError::persistence(dir, e));
                return;
            }
        };

        if files.is_empty() {
            debug!("No theme files in {}", dir.display());
        }

        for path in files {
            match load_theme_file(&path, source) {
                Ok(theme) => {
                    info!("Loaded {} theme '{}' from {}", source.as_str(), theme.name, path.display());
                    self.insert(theme);
                }
                Err(e) => {
                    warn!("Skipping theme file: {e}");
                    self.problems.push(e);
                }
            }
        }
    }

    /// Insert or overwrite by name; returns the stored theme.
    fn insert(&mut self, theme: Theme) -> &Theme {
        let idx = match self.index.get(&theme.name) {
            Some(&idx) => {
                debug!(
                    "Theme '{}' from {} replaces the {} version",
                    theme.name,
                    theme.source.as_str(),
                    self.themes[idx].source.as_str()
                );
                self.themes[idx] = theme;
                idx
            }
            None => {
                self.index.insert(theme.name.clone(), self.themes.len());
                self.themes.push(theme);
                self.themes.len() - 1
            }
        };
        &self.themes[idx]
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.themes[idx])
    }

    /// Like [`get`](Self::get), but a miss is an [`EpicError::ThemeNotFound`].
    pub fn require(&self, name: &str) -> Result<&Theme, EpicError> {
        self.get(name)
            .ok_or_else(|| EpicError::ThemeNotFound(name.to_string()))
    }

    /// Theme names in insertion order.
    pub fn list_names(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn list_by_source(&self) -> ThemesBySource {
        let mut by_source = ThemesBySource::default();
        for theme in &self.themes {
            match theme.source {
                ThemeSource::Default => by_source.default.push(theme.name.clone()),
                ThemeSource::Custom => by_source.custom.push(theme.name.clone()),
            }
        }
        by_source.default.sort();
        by_source.custom.sort();
        by_source
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn dirs(&self) -> &ThemeDirs {
        &self.dirs
    }

    /// Files and directories skipped while loading.
    pub fn problems(&self) -> &[EpicError] {
        &self.problems
    }

    /// Load a single theme file as a custom theme.
    ///
    /// With `persist`, the file is first copied into the custom directory as
    /// `<name>_theme.json`. An invalid file or a failed copy leaves both the
    /// registry and the custom directory untouched.
    pub fn add(&mut self, path: &Path, persist: bool) -> Result<&Theme, EpicError> {
        let theme = load_theme_file(path, ThemeSource::Custom)?;

        if persist {
            let dest = self.persist_copy(path, &theme.name)?;
            info!("Added permanent theme '{}' -> {}", theme.name, dest.display());
        } else {
            info!("Added session-only theme '{}'", theme.name);
        }

        Ok(self.insert(theme))
    }

    fn persist_copy(&self, src: &Path, name: &str) -> Result<PathBuf, EpicError> {
        let file_name = canonical_file_name(name)
            .ok_or_else(|| EpicError::validation(src, format!("unusable theme name '{name}'")))?;
        let custom_dir = &self.dirs.custom_dir;

        fs::create_dir_all(custom_dir).map_err(|e| EpicError::persistence(custom_dir, e))?;
        let dest = custom_dir.join(file_name);

        if same_file(src, &dest) {
            debug!("{} is already in the custom theme directory", src.display());
            return Ok(dest);
        }

        fs::copy(src, &dest).map_err(|e| EpicError::persistence(&dest, e))?;
        Ok(dest)
    }

    /// Write a placeholder theme file into the custom directory for the user
    /// to edit. An existing file of the same name is overwritten.
    pub fn create_template(&self, name: &str) -> Result<PathBuf, EpicError> {
        let file_name = canonical_file_name(name)
            .ok_or_else(|| EpicError::validation(name, "unusable theme name"))?;
        let custom_dir = &self.dirs.custom_dir;

        fs::create_dir_all(custom_dir).map_err(|e| EpicError::persistence(custom_dir, e))?;
        let dest = custom_dir.join(file_name);

        if dest.exists() {
            warn!("Overwriting existing theme file {}", dest.display());
        }

        let mut body = serde_json::to_string_pretty(&ThemeDefinition::template(name))
            .map_err(|e| EpicError::persistence(&dest, io::Error::other(e)))?;
        body.push('\n');

        fs::write(&dest, body).map_err(|e| EpicError::persistence(&dest, e))?;
        info!("Theme template created: {}", dest.display());
        Ok(dest)
    }
}

/// Theme files directly inside `dir`, sorted by file name.
fn theme_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_theme = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(THEME_FILE_EXTENSION));
        if is_theme {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
