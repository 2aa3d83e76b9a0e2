use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::Deserialize;

/// On-disk configuration. Every key is optional; unset values resolve
/// to platform defaults in [`resolve`].
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Live browser history store to snapshot.
    pub source_path: Option<PathBuf>,
    /// Durable merged store.
    pub merged_path: Option<PathBuf>,
    /// Directory for snapshot copies.
    pub snapshot_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub source: PathBuf,
    pub merged: PathBuf,
    pub snapshot_dir: PathBuf,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p)?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };
    let config: Config = serde_yaml::from_slice(&bytes)?;
    Ok(config)
}

/// Combine config values with CLI overrides and platform defaults.
/// CLI wins over config, config wins over detection.
pub fn resolve(
    config: &Config,
    source_override: Option<PathBuf>,
    merged_override: Option<PathBuf>,
) -> Result<ResolvedPaths> {
    let source = source_override
        .or_else(|| config.source_path.clone())
        .or_else(detect_source)
        .ok_or_else(|| {
            anyhow!("no browser history store found; pass --source or set source_path in config")
        })?;
    let merged = merged_override
        .or_else(|| config.merged_path.clone())
        .or_else(default_merged_path)
        .ok_or_else(|| anyhow!("could not determine a merged store path; pass --merged"))?;
    let snapshot_dir = config
        .snapshot_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    Ok(ResolvedPaths {
        source,
        merged,
        snapshot_dir,
    })
}

/// First existing history store among the common Chromium-family
/// profile locations.
fn detect_source() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    const CANDIDATES: &[&str] = &[
        ".config/BraveSoftware/Brave-Browser/Default/History",
        ".config/google-chrome/Default/History",
        ".config/chromium/Default/History",
        "Library/Application Support/BraveSoftware/Brave-Browser/Default/History",
        "Library/Application Support/Google/Chrome/Default/History",
    ];
    CANDIDATES
        .iter()
        .map(|rel| home.join(rel))
        .find(|path| path.exists())
}

fn default_merged_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("bhq").join("merged_history.sqlite"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_parses() {
        let config = load_config(None).expect("default config");
        assert!(config.source_path.is_none());
        assert!(config.merged_path.is_none());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bhq.yml");
        std::fs::write(
            &path,
            "source_path: /srv/History\nmerged_path: /srv/merged.sqlite\nsnapshot_dir: /srv/tmp\n",
        )
        .expect("write config");
        let config = load_config(Some(&path)).expect("config");
        assert_eq!(config.source_path.as_deref(), Some(Path::new("/srv/History")));
        assert_eq!(config.snapshot_dir.as_deref(), Some(Path::new("/srv/tmp")));
    }

    #[test]
    fn cli_overrides_win() {
        let config = Config {
            source_path: Some(PathBuf::from("/cfg/History")),
            merged_path: Some(PathBuf::from("/cfg/merged.sqlite")),
            snapshot_dir: Some(PathBuf::from("/cfg/tmp")),
        };
        let paths = resolve(&config, Some(PathBuf::from("/cli/History")), None).expect("resolve");
        assert_eq!(paths.source, PathBuf::from("/cli/History"));
        assert_eq!(paths.merged, PathBuf::from("/cfg/merged.sqlite"));
        assert_eq!(paths.snapshot_dir, PathBuf::from("/cfg/tmp"));
    }
}
