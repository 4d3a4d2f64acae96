use crate::error::Error;
use crate::settings::{HeaderDef, SettingsDef, BRANCH_WIDTH, DEFAULT_WIDTH};
use std::path::{Path, PathBuf};

/// Name of the settings file in the application config directory.
pub const APP_CONFIG_FILE: &str = "config.toml";
/// Name of the settings file in a repository's `.git` directory.
pub const REPO_CONFIG_FILE: &str = "git-branch-props.toml";

/// The application settings file, `APP_CONFIG/git-branch-props/config.toml`.
pub fn app_config_path() -> Option<PathBuf> {
    platform_dirs::AppDirs::new(Some("git-branch-props"), false)
        .map(|dirs| dirs.config_dir.join(APP_CONFIG_FILE))
}

/// Writes a settings file with the built-in defaults, unless it exists.
pub fn create_config<P: AsRef<Path>>(path: &P) -> Result<bool, Error> {
    let path: &Path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| Error::Config(err.to_string()))?;
    }
    let str = toml::to_string_pretty(&default_def()).map_err(|err| Error::Config(err.to_string()))?;
    std::fs::write(path, str).map_err(|err| Error::Config(err.to_string()))?;
    Ok(true)
}

/// Reads a settings file, `None` if it does not exist.
pub fn read_settings<P: AsRef<Path>>(path: &P) -> Result<Option<SettingsDef>, Error> {
    let path: &Path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let str = std::fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
    toml::from_str(&str)
        .map(Some)
        .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))
}

/// Layers the application and repository settings files over the defaults.
pub fn load_settings(git_dir: &Path, app_config: Option<&Path>) -> Result<SettingsDef, Error> {
    let mut def = default_def();
    if let Some(app_config) = app_config {
        if let Some(app) = read_settings(&app_config)? {
            def = def.merge(app);
        }
    }
    if let Some(repo) = read_settings(&git_dir.join(REPO_CONFIG_FILE))? {
        log::debug!("Using repository settings from {}", git_dir.display());
        def = def.merge(repo);
    }
    Ok(def)
}

fn default_def() -> SettingsDef {
    SettingsDef {
        branch_width: Some(BRANCH_WIDTH),
        default_width: Some(DEFAULT_WIDTH),
        header: HeaderDef {
            color: None,
            bold: Some(false),
        },
        ..SettingsDef::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{create_config, load_settings, read_settings, REPO_CONFIG_FILE};

    #[test]
    fn missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_settings(&dir.path().join("none.toml")).unwrap(), None);
        let def = load_settings(dir.path(), None).unwrap();
        assert_eq!(def.branch_width, Some(40));
        assert_eq!(def.default_width, Some(8));
    }

    #[test]
    fn layered_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app").join("config.toml");
        assert!(create_config(&app).unwrap());
        assert!(!create_config(&app).unwrap());

        std::fs::write(
            dir.path().join(REPO_CONFIG_FILE),
            "default_width = 5\n[widths]\nowner = 11\n",
        )
        .unwrap();
        let def = load_settings(dir.path(), Some(app.as_path())).unwrap();
        assert_eq!(def.branch_width, Some(40));
        assert_eq!(def.default_width, Some(5));
        assert_eq!(def.widths.get("owner"), Some(&11));
    }

    #[test]
    fn invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REPO_CONFIG_FILE), "default_width = \"wide\"").unwrap();
        assert!(load_settings(dir.path(), None).is_err());
    }
}
