//! Load runtime configuration. Every field has a default; the file is optional.

use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuoteCfg {
    pub base_url: String,
    pub chain: String,            // path segment, e.g. "base"
    pub timeout_sec: Option<u64>, // transport default when unset
}

impl Default for QuoteCfg {
    fn default() -> Self {
        Self {
            base_url: "https://api.dexscreener.com/latest/dex/pairs".to_string(),
            chain: "base".to_string(),
            timeout_sec: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogCfg {
    pub level: String,
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub quote: QuoteCfg,
    pub log: LogCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_yaml(&s).with_context(|| format!("parse config {}", path.display()))
    }

    /// Like `load`, but a missing file means defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_yaml(s: &str) -> anyhow::Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(s)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = AppConfig::from_yaml("quote:\n  chain: solana\n").unwrap();
        assert_eq!(cfg.quote.chain, "solana");
        assert_eq!(
            cfg.quote.base_url,
            "https://api.dexscreener.com/latest/dex/pairs"
        );
        assert_eq!(cfg.quote.timeout_sec, None);
        assert_eq!(cfg.log.level, "warn");
    }

    #[test]
    fn full_yaml() {
        let yaml = r#"
quote:
  base_url: "http://localhost:8080/pairs"
  chain: "base"
  timeout_sec: 5
log:
  level: "debug"
"#;
        let cfg = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.quote.base_url, "http://localhost:8080/pairs");
        assert_eq!(cfg.quote.timeout_sec, Some(5));
        assert_eq!(cfg.log.level, "debug");
    }

    #[test]
    fn empty_file_is_default() {
        let cfg = AppConfig::from_yaml("").unwrap();
        assert_eq!(cfg.quote.chain, "base");
    }

    #[test]
    fn malformed_yaml_is_error() {
        assert!(AppConfig::from_yaml("quote: [1, 2").is_err());
        assert!(AppConfig::from_yaml("quote:\n  timeout_sec: soon\n").is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let cfg = AppConfig::load_or_default("definitely/not/here/config.yaml").unwrap();
        assert_eq!(cfg.log.level, "warn");
    }
}
