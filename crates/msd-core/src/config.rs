use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::assembly::DEFAULT_BUFFER_SIZE;

/// Global configuration loaded from `~/.config/msd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsdConfig {
    /// Directory holding part files. Empty means the current directory.
    #[serde(default)]
    pub parts_dir: String,
    /// Filename prefix that marks a file as ours.
    pub prefix_parts: String,
    /// Keep part files after a successful assembly.
    #[serde(default)]
    pub keep_parts: bool,
    /// Copy buffer size in bytes (None = 64 KiB).
    #[serde(default)]
    pub copy_buffer_bytes: Option<usize>,
}

impl Default for MsdConfig {
    fn default() -> Self {
        Self {
            parts_dir: String::new(),
            prefix_parts: "output-".to_string(),
            keep_parts: false,
            copy_buffer_bytes: None,
        }
    }
}

impl MsdConfig {
    pub fn buffer_size(&self) -> usize {
        self.copy_buffer_bytes
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_BUFFER_SIZE)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("msd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MsdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MsdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MsdConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MsdConfig::default();
        assert_eq!(cfg.parts_dir, "");
        assert_eq!(cfg.prefix_parts, "output-");
        assert!(!cfg.keep_parts);
        assert_eq!(cfg.buffer_size(), 64 * 1024);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MsdConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MsdConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.parts_dir, cfg.parts_dir);
        assert_eq!(parsed.prefix_parts, cfg.prefix_parts);
        assert_eq!(parsed.keep_parts, cfg.keep_parts);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            parts_dir = "parts"
            prefix_parts = "part_"
            keep_parts = true
            copy_buffer_bytes = 4096
        "#;
        let cfg: MsdConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.parts_dir, "parts");
        assert_eq!(cfg.prefix_parts, "part_");
        assert!(cfg.keep_parts);
        assert_eq!(cfg.buffer_size(), 4096);
    }

    #[test]
    fn config_toml_minimal() {
        let cfg: MsdConfig = toml::from_str(r#"prefix_parts = "output-""#).unwrap();
        assert_eq!(cfg.parts_dir, "");
        assert!(!cfg.keep_parts);
        assert!(cfg.copy_buffer_bytes.is_none());
    }

    #[test]
    fn zero_buffer_falls_back_to_default() {
        let cfg = MsdConfig {
            copy_buffer_bytes: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.buffer_size(), 64 * 1024);
    }
}
