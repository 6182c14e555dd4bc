use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Which ledger the session operates on. Picked once at startup; every
/// ledger read and write for the session goes through the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Workspace {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "p2p")]
    PeerToPeer,
}

impl Workspace {
    /// Storage key this workspace's ledger persists under.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Workspace::Default => "movies_1",
            Workspace::PeerToPeer => "movies_p2p",
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::Default
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub workspace: Workspace,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "pt-BR".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: Workspace::default(),
            api_key: None,
            language: default_language(),
        }
    }
}

impl AppConfig {
    /// Loads the config file, falling back to defaults when the file is
    /// missing or no longer parses.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            Ok(serde_json::from_str(&contents).unwrap_or_default())
        } else {
            Ok(Self::default())
        }
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Platform data directory for the tool, e.g. `~/.local/share/cinetrack`.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("No platform data directory available")?;
    Ok(base.join("cinetrack"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_keys_are_fixed() {
        assert_eq!(Workspace::Default.storage_key(), "movies_1");
        assert_eq!(Workspace::PeerToPeer.storage_key(), "movies_p2p");
    }

    #[test]
    fn missing_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.workspace, Workspace::Default);
        assert_eq!(config.language, "pt-BR");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn corrupt_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{{{").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.workspace, Workspace::Default);
    }

    #[test]
    fn config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            workspace: Workspace::PeerToPeer,
            api_key: Some("k".into()),
            language: "en-US".into(),
        };
        config.persist(&path).unwrap();
        let back = AppConfig::load(&path).unwrap();
        assert_eq!(back.workspace, Workspace::PeerToPeer);
        assert_eq!(back.api_key.as_deref(), Some("k"));
        assert_eq!(back.language, "en-US");
    }
}
