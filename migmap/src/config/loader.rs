//! Finding and parsing the YAML layers that feed [`ConfigBuilder`](super::ConfigBuilder).

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Checked-in settings shared by everyone running in a directory.
pub const PROJECT_CONFIG: &str = "migmap.yaml";

/// Per-machine overrides next to [`PROJECT_CONFIG`], usually git-ignored.
pub const LOCAL_CONFIG: &str = "migmap.local.yaml";

/// File name looked up inside the data directory.
pub const USER_CONFIG: &str = "config.yaml";

/// Where a config file was found. Later variants override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigLayer {
    /// The per-user config in the data directory.
    User,
    /// The checked-in project config.
    Project,
    /// The per-machine local override.
    Local,
}

/// One parsed config file.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path the config was read from.
    pub path: PathBuf,
    /// Which layer the file belongs to.
    pub layer: ConfigLayer,
    /// The parsed contents.
    pub config: Config,
}

/// Locates and parses config layers.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Returns every config layer that exists, weakest first.
    ///
    /// The user layer is read from `data_dir`, or from the resolved data
    /// directory when `None`.
    ///
    /// # Errors
    ///
    /// Fails if a file is present but unreadable or not valid YAML.
    pub fn load_all(working_dir: &Path, data_dir: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => crate::database::resolve_data_dir()?,
        };

        let mut sources = Self::read_layers(&data_dir, &[(USER_CONFIG, ConfigLayer::User)])?;
        sources.extend(Self::discover_project_configs(working_dir)?);
        sources.sort_by_key(|s| s.layer);
        Ok(sources)
    }

    /// Walks from `start_dir` toward the root and returns the project and
    /// local layers of the nearest directory that has either.
    ///
    /// # Errors
    ///
    /// Fails if a discovered file cannot be loaded.
    pub fn discover_project_configs(start_dir: &Path) -> Result<Vec<ConfigSource>> {
        const NAMES: [(&str, ConfigLayer); 2] = [
            (PROJECT_CONFIG, ConfigLayer::Project),
            (LOCAL_CONFIG, ConfigLayer::Local),
        ];

        for dir in start_dir.ancestors() {
            let found = Self::read_layers(dir, &NAMES)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }

    /// Parses one YAML file.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] when the file cannot be read,
    /// [`Error::Validation`] when it does not parse.
    pub fn load_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("cannot read config file: {e}"),
        })?;

        serde_yaml::from_str(&text).map_err(|e| Error::Validation {
            field: path.display().to_string(),
            message: format!("invalid YAML: {e}"),
        })
    }

    fn read_layers(dir: &Path, names: &[(&str, ConfigLayer)]) -> Result<Vec<ConfigSource>> {
        names
            .iter()
            .map(|&(name, layer)| (dir.join(name), layer))
            .filter(|(path, _)| path.is_file())
            .map(|(path, layer)| {
                let config = Self::load_file(&path)?;
                log::debug!("loaded {layer:?} config from {}", path.display());
                Ok(ConfigSource { path, layer, config })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_invalid_path() {
        let result = ConfigLoader::load_file(Path::new("/nonexistent/path/config.yaml"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "invalid: yaml: syntax:").unwrap();

        assert!(matches!(
            ConfigLoader::load_file(&path),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_discover_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigLoader::discover_project_configs(dir.path())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_discover_returns_project_then_local() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG), "concurrency: 8\n").unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG), "concurrency: 4\n").unwrap();

        let found = ConfigLoader::discover_project_configs(dir.path()).unwrap();
        let layers: Vec<_> = found.iter().map(|s| s.layer).collect();
        assert_eq!(layers, vec![ConfigLayer::Project, ConfigLayer::Local]);
        assert_eq!(found[0].config.concurrency, Some(4));
        assert_eq!(found[1].config.concurrency, Some(8));
    }

    #[test]
    fn test_discover_uses_nearest_directory_only() {
        let root = TempDir::new().unwrap();
        let child = root.path().join("child");
        let leaf = child.join("leaf");
        fs::create_dir_all(&leaf).unwrap();
        fs::write(root.path().join(LOCAL_CONFIG), "concurrency: 1\n").unwrap();
        fs::write(child.join(PROJECT_CONFIG), "concurrency: 2\n").unwrap();

        let found = ConfigLoader::discover_project_configs(&leaf).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, child.join(PROJECT_CONFIG));
    }

    #[test]
    fn test_directory_named_like_config_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(PROJECT_CONFIG)).unwrap();

        assert!(ConfigLoader::discover_project_configs(dir.path())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_load_all_orders_user_before_local() {
        let data = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        fs::write(data.path().join(USER_CONFIG), "concurrency: 3\n").unwrap();
        fs::write(work.path().join(LOCAL_CONFIG), "concurrency: 9\n").unwrap();

        let sources = ConfigLoader::load_all(work.path(), Some(data.path())).unwrap();
        let layers: Vec<_> = sources.iter().map(|s| s.layer).collect();
        assert_eq!(layers, vec![ConfigLayer::User, ConfigLayer::Local]);
    }
}
