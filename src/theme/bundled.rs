use std::fs;
use std::path::Path;

use log::info;

use super::THEME_FILE_EXTENSION;
use crate::error::EpicError;

/// Default themes compiled into the binary: (file name, contents).
pub const BUNDLED_THEMES: &[(&str, &str)] = &[
    (
        "medieval_theme.json",
        include_str!("../../themes/default/medieval_theme.json"),
    ),
    (
        "space_theme.json",
        include_str!("../../themes/default/space_theme.json"),
    ),
    (
        "superhero_theme.json",
        include_str!("../../themes/default/superhero_theme.json"),
    ),
    (
        "mythology_theme.json",
        include_str!("../../themes/default/mythology_theme.json"),
    ),
];

/// Write the bundled themes into `dir` if it holds no theme files yet.
/// Returns how many files were written.
pub fn seed_defaults(dir: &Path) -> Result<usize, EpicError> {
    fs::create_dir_all(dir).map_err(|e| EpicError::persistence(dir, e))?;

    let has_themes = fs::read_dir(dir)
        .map_err(|e| EpicError::persistence(dir, e))?
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(THEME_FILE_EXTENSION))
        });
    if has_themes {
        return Ok(0);
    }

    for (file_name, contents) in BUNDLED_THEMES {
        let dest = dir.join(file_name);
        fs::write(&dest, contents).map_err(|e| EpicError::persistence(&dest, e))?;
    }

    info!("Installed {} default themes into {}", BUNDLED_THEMES.len(), dir.display());
    Ok(BUNDLED_THEMES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeDefinition, ThemeSource};

    #[test]
    fn bundled_themes_are_valid() {
        for (file_name, contents) in BUNDLED_THEMES {
            let path = Path::new(file_name);
            let theme = ThemeDefinition::parse(contents, path)
                .and_then(|def| def.into_theme(path, ThemeSource::Default))
                .unwrap_or_else(|e| panic!("{file_name}: {e}"));
            assert!(file_name.starts_with(&theme.name));
            assert!(theme.emoji.is_some());
        }
    }
}
