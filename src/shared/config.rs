use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Fetch behavior: timing and request identity
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchCfg {
    /// Per-page navigation budget, seconds
    pub timeout_secs: u64,
    /// Fixed delay between source fetches, milliseconds
    pub delay_ms: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// When set, fetched bodies are dumped here and diagnostics carry the
    /// file name as an artifact reference
    pub capture_dir: Option<String>,
}

impl Default for FetchCfg {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            delay_ms: 400,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "tr-TR,tr;q=0.9,en;q=0.6".to_string(),
            capture_dir: None,
        }
    }
}

/// Detection knobs: keyword and selector sets are best-effort configuration,
/// not a contract - retail pages change these too often to hard-code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectCfg {
    /// Anti-bot challenge keywords, matched case-insensitively against the
    /// page title and body text
    pub blocked_keywords: Vec<String>,
    /// Metadata attribute names probed for a price, in order
    pub meta_price_fields: Vec<String>,
    /// Currency markers that introduce a price in visible text
    pub currency_markers: Vec<String>,
    /// Visible-text prices below this are ignored (accessory listings tend
    /// to pollute product pages); 0 disables the filter
    pub visible_floor: f64,
}

impl Default for DetectCfg {
    fn default() -> Self {
        Self {
            blocked_keywords: [
                "captcha",
                "robot",
                "blocked",
                "unusual traffic",
                "access denied",
                "are you human",
                "erişim engellendi",
                "doğrulama",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            meta_price_fields: [
                "product:price:amount",
                "og:price:amount",
                "price",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            currency_markers: vec!["₺".to_string()],
            visible_floor: 0.0,
        }
    }
}

/// File locations for catalog input and run outputs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    pub catalog_path: String,
    pub snapshot_path: String,
    pub history_path: String,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            catalog_path: "products.json".to_string(),
            snapshot_path: "docs/data.json".to_string(),
            history_path: "docs/history.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchCfg,
    pub detect: DetectCfg,
    pub output: OutputCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse config file")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let cfg = Config::default();
        assert_eq!(cfg.fetch.timeout_secs, 45);
        assert_eq!(cfg.fetch.delay_ms, 400);
        assert!(cfg.detect.blocked_keywords.iter().any(|k| k == "captcha"));
        assert!(!cfg.detect.meta_price_fields.is_empty());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [fetch]
            delay_ms = 1000

            [detect]
            visible_floor = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fetch.delay_ms, 1000);
        assert_eq!(cfg.fetch.timeout_secs, 45);
        assert_eq!(cfg.detect.visible_floor, 50.0);
        assert_eq!(cfg.output.catalog_path, "products.json");
    }
}
