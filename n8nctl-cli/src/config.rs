//! Connection settings: flag > environment > `.env` > `~/.n8n/config.yaml` > default.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Deserialize;

use n8nctl_api::HttpClient;

pub const DEFAULT_INSTANCE_URL: &str = "http://localhost:5678";

/// Only keys with this prefix are taken from `.env`.
const ENV_PREFIX: &str = "N8N_";

// ---------------------------------------------------------------------------
// .env
// ---------------------------------------------------------------------------

/// Parse `KEY=VALUE` lines, keeping only `N8N_*` keys.
///
/// Blank lines, `#` comments and lines without `=` are ignored. Surrounding
/// single or double quotes are stripped from values.
pub fn parse_dotenv(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
            (key.trim().to_string(), value.to_string())
        })
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Export `N8N_*` keys from `path` into the process environment.
///
/// Variables that are already set win. A missing file is not an error.
pub fn load_dotenv(path: &Path) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
        Err(e) => {
            eprintln!("Warning: Error reading {}: {e}", path.display());
            return;
        }
    };

    for (key, value) in parse_dotenv(&content) {
        if std::env::var_os(&key).map_or(true, |v| v.is_empty()) {
            std::env::set_var(key, value);
        }
    }
}

// ---------------------------------------------------------------------------
// ~/.n8n/config.yaml
// ---------------------------------------------------------------------------

/// Contents of `~/.n8n/config.yaml`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub instance_url: Option<String>,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".n8n").join("config.yaml"))
}

/// Read `path`. Missing files are empty; malformed ones are a warning.
pub fn load_file_config(path: &Path) -> FileConfig {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return FileConfig::default(),
    };
    match serde_yaml::from_str::<Option<FileConfig>>(&content) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("config file {} ignored: {e}", path.display());
            FileConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub instance_url: String,
}

impl Settings {
    /// Merge flag/env values (already combined by clap) over `file`.
    pub fn resolve(
        api_key: Option<String>,
        instance_url: Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .or(file.api_key.filter(|k| !k.is_empty()));
        let Some(api_key) = api_key else {
            bail!(
                "API key is required. Set it using the --api-key flag or N8N_API_KEY environment variable"
            );
        };

        let instance_url = instance_url
            .filter(|u| !u.is_empty())
            .or(file.instance_url.filter(|u| !u.is_empty()))
            .unwrap_or_else(|| DEFAULT_INSTANCE_URL.to_string());

        Ok(Self {
            api_key,
            instance_url,
        })
    }

    pub fn client(&self) -> HttpClient {
        tracing::debug!("using n8n instance at {}", self.instance_url);
        HttpClient::new(&self.instance_url, self.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dotenv_keeps_only_prefixed_keys() {
        let parsed = parse_dotenv(
            "# comment\n\nN8N_API_KEY=\"secret\"\nN8N_INSTANCE_URL='http://n8n:5678'\nOTHER=1\nbroken\n",
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["N8N_API_KEY"], "secret");
        assert_eq!(parsed["N8N_INSTANCE_URL"], "http://n8n:5678");
    }

    #[test]
    fn flag_beats_config_file() {
        let file = FileConfig {
            api_key: Some("from-file".into()),
            instance_url: Some("http://file:5678".into()),
        };
        let settings = Settings::resolve(Some("from-flag".into()), None, file).unwrap();
        assert_eq!(settings.api_key, "from-flag");
        assert_eq!(settings.instance_url, "http://file:5678");
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = Settings::resolve(Some(String::new()), None, FileConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("API key is required"));
    }

    #[test]
    fn url_defaults_to_localhost() {
        let settings = Settings::resolve(Some("k".into()), None, FileConfig::default()).unwrap();
        assert_eq!(settings.instance_url, DEFAULT_INSTANCE_URL);
    }

    #[test]
    fn config_file_is_read_and_tolerates_garbage() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.yaml");
        fs::write(&good, "api_key: abc\ninstance_url: http://x\n").unwrap();
        assert_eq!(load_file_config(&good).api_key.as_deref(), Some("abc"));

        let bad = tmp.path().join("bad.yaml");
        fs::write(&bad, "api_key: [unclosed\n").unwrap();
        assert_eq!(load_file_config(&bad), FileConfig::default());

        assert_eq!(load_file_config(&tmp.path().join("absent.yaml")), FileConfig::default());
    }
}
