use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_accuracy() -> f64 {
    0.0
}
fn default_verbose() -> bool {
    false
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Path or http(s) URL of the geofence document
    #[serde(default)]
    pub geofence: Option<String>,
    /// Accuracy radius in metres used when none is given on the command line
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            geofence: None,
            accuracy: default_accuracy(),
            verbose: default_verbose(),
            log_level: default_log_level(),
            remote: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_secs() -> u64 {
    5
}

/// HTTP settings for geofence documents served from a URL
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_secs: default_retry_backoff_secs(),
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the standard search locations
    pub fn load() -> Option<Self> {
        Self::load_first(&get_config_paths())
    }

    fn load_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to parse config file"
                        );
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; a missing file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("geocheck.toml"));
    paths.push(PathBuf::from(".geocheck.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("geocheck").join("config.toml"));
        paths.push(config_dir.join("geocheck.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".geocheck.toml"));
        paths.push(home.join(".config").join("geocheck").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.geofence.is_none());
        assert_eq!(config.accuracy, 0.0);
        assert!(!config.verbose);
        assert_eq!(config.log_level, "info");
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_full_file() {
        let config: FileConfig = toml::from_str(
            r#"
            geofence = "https://example.com/geofence.json"
            accuracy = 25.5
            verbose = true
            log_level = "geocheck=debug"

            [remote]
            timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(
            config.geofence.as_deref(),
            Some("https://example.com/geofence.json")
        );
        assert_eq!(config.accuracy, 25.5);
        assert!(config.verbose);
        let remote = config.remote.unwrap();
        assert_eq!(remote.timeout_secs, 10);
        assert_eq!(remote.max_retries, 3);
        assert_eq!(remote.retry_backoff_secs, 5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load_from(&dir.path().join("geocheck.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_first_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "accuracy = [").unwrap();
        std::fs::write(&good, "accuracy = 12.0").unwrap();

        let paths = [dir.path().join("missing.toml"), broken, good];
        let config = FileConfig::load_first(&paths).unwrap();
        assert_eq!(config.accuracy, 12.0);
    }

    #[test]
    fn test_load_first_none_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::load_first(&[dir.path().join("missing.toml")]).is_none());
    }
}
