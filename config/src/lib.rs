//! Configuration loading for capmatrix.
//!
//! Declarations live in a TOML file, by default `~/.capmatrix/config.toml`:
//!
//! ```toml
//! [matrix]
//! mode = "enforce"
//! scenarios = ["draft", "published"]
//! operations = ["view", "edit"]
//!
//! [[matrix.products]]
//! operate = ["view"]
//! scenario = "none"
//!
//! [[matrix.products]]
//! operate = ["view", "edit"]
//! scenario = "draft"
//! ```
//!
//! The raw structs below are private; callers only ever see a validated
//! [`MatrixSettings`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use capmatrix_types::{
    Declarations, MatrixMode, MatrixSettings, ProductDecl, ScenarioSet, SettingsError,
};
use serde::Deserialize;
use thiserror::Error;
use toml::de::Error as TomlError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: TomlError,
    },
    #[error("invalid matrix config at {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: SettingsError,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    matrix: Option<RawMatrix>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMatrix {
    #[serde(default)]
    mode: MatrixMode,
    #[serde(default)]
    scenarios: Vec<String>,
    #[serde(default)]
    operations: Vec<String>,
    #[serde(default)]
    products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    operate: Vec<String>,
    scenario: String,
}

impl RawMatrix {
    fn resolve(self) -> Result<MatrixSettings, SettingsError> {
        let products = self
            .products
            .into_iter()
            .map(|product| ProductDecl::new(product.operate, product.scenario))
            .collect();
        MatrixSettings::new(
            self.mode,
            ScenarioSet::new(self.scenarios),
            Declarations::new(self.operations, products),
        )
    }
}

/// Default config location: `~/.capmatrix/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".capmatrix").join("config.toml"))
}

/// Load settings from the default location.
///
/// Returns `Ok(None)` when there is no home directory or no config file.
pub fn load() -> Result<Option<MatrixSettings>, ConfigError> {
    match config_path() {
        Some(path) => load_if_present(&path),
        None => Ok(None),
    }
}

fn load_if_present(path: &Path) -> Result<Option<MatrixSettings>, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file; matrix stays unconfigured");
        return Ok(None);
    }
    load_from(path).map(Some)
}

pub fn load_from(path: &Path) -> Result<MatrixSettings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("Failed to read config at {:?}: {}", path, err);
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    parse(&content, path)
}

/// Parse config text. `path` is only used for error reporting.
///
/// A document without a `[matrix]` table yields the default settings, which
/// deny every query.
pub fn parse(content: &str, path: &Path) -> Result<MatrixSettings, ConfigError> {
    let raw: RawConfig = match toml::from_str(content) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!("Failed to parse config at {:?}: {}", path, err);
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let Some(matrix) = raw.matrix else {
        tracing::debug!(path = %path.display(), "No [matrix] table; using defaults");
        return Ok(MatrixSettings::default());
    };

    matrix.resolve().map_err(|source| {
        tracing::warn!("Invalid matrix config at {:?}: {}", path, source);
        ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use capmatrix_types::{MatrixMode, ProductDecl, SettingsError};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{ConfigError, config_path, load_if_present, parse};

    const EDITORIAL: &str = r#"
[matrix]
scenarios = ["draft", "published"]
operations = ["view", "edit"]

[[matrix.products]]
operate = ["view"]
scenario = "none"

[[matrix.products]]
operate = ["view", "edit"]
scenario = "draft"
"#;

    fn path() -> &'static Path {
        Path::new("test.toml")
    }

    #[test]
    fn parse_valid_matrix() {
        let settings = parse(EDITORIAL, path()).unwrap();
        assert_eq!(settings.mode(), MatrixMode::Enforce);
        assert_eq!(
            settings.scenarios().iter().collect::<Vec<_>>(),
            ["none", "draft", "published"]
        );
        assert_eq!(settings.declarations().operations, ["view", "edit"]);
        assert_eq!(
            settings.declarations().products,
            vec![
                ProductDecl::new(["view"], "none"),
                ProductDecl::new(["view", "edit"], "draft"),
            ]
        );
    }

    #[test]
    fn parse_allow_all_mode() {
        let settings = parse("[matrix]\nmode = \"allow_all\"\n", path()).unwrap();
        assert_eq!(settings.mode(), MatrixMode::AllowAll);
        assert!(settings.declarations().products.is_empty());
    }

    #[test]
    fn missing_matrix_table_is_default() {
        let settings = parse("# nothing here\n", path()).unwrap();
        assert_eq!(settings.mode(), MatrixMode::Enforce);
        assert_eq!(settings.scenarios().len(), 1);
        assert!(settings.declarations().operations.is_empty());
    }

    #[test]
    fn product_without_operate_is_scenario_only() {
        let content = "[matrix]\nscenarios = [\"draft\"]\n\n[[matrix.products]]\nscenario = \"draft\"\n";
        let settings = parse(content, path()).unwrap();
        assert!(settings.declarations().products[0].operate.is_empty());
    }

    #[test]
    fn unknown_mode_is_parse_error() {
        let err = parse("[matrix]\nmode = \"permissive\"\n", path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
        assert_eq!(err.path(), path());
    }

    #[test]
    fn undeclared_operation_is_invalid() {
        let content = r#"
[matrix]
operations = ["view"]

[[matrix.products]]
operate = ["view", "edit"]
scenario = "none"
"#;
        let err = parse(content, path()).unwrap_err();
        match err {
            ConfigError::Invalid { source, .. } => assert_eq!(
                source,
                SettingsError::UndeclaredOperation {
                    index: 0,
                    name: "edit".to_string()
                }
            ),
            other => panic!("expected Invalid, got: {other}"),
        }
    }

    #[test]
    fn error_message_names_path() {
        let err = parse("[matrix\n", Path::new("/etc/capmatrix.toml")).unwrap_err();
        assert!(err.to_string().contains("/etc/capmatrix.toml"), "got: {err}");
    }

    #[test]
    fn absent_default_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".capmatrix").join("config.toml");
        assert!(load_if_present(&path).unwrap().is_none());
    }

    #[test]
    fn present_default_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, EDITORIAL).unwrap();

        let settings = load_if_present(&path).unwrap().unwrap();
        assert_eq!(settings.declarations().operations, ["view", "edit"]);
    }

    #[test]
    fn present_but_broken_file_is_still_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[matrix\n").unwrap();

        let err = load_if_present(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn config_path_under_home() {
        if let Some(path) = config_path() {
            assert!(path.ends_with(".capmatrix/config.toml"));
        }
    }
}
