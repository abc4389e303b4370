use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analysis::AnalysisConfig;
use crate::category::CategoryTable;
use crate::normalizer::TextConfig;
use crate::recommend::Thresholds;
use crate::scoring::RiskWeights;

/// Root configuration structure, deserialized from `.label-checkr/config.toml`.
///
/// Every section is optional; missing sections take the built-in defaults.
///
/// ```toml
/// [knowledge_base]
/// sources = ["ingredients.json", "https://example.org/tables/ingredients?limit=100"]
///
/// [scoring.weights]
/// unrecognized = 6
///
/// [categories]
/// fallback = "otro"
///
/// [[categories.rules]]
/// name = "alimento"
/// keywords = ["ingredientes", "alimento"]
///
/// [thresholds]
/// animal_alert_at_or_below = 60
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub knowledge_base: KnowledgeBaseConfig,
    pub text: TextConfig,
    pub scoring: ScoringConfig,
    pub categories: CategoryTable,
    pub thresholds: Thresholds,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// File paths or `http(s)://` table endpoints, concatenated in this order.
    pub sources: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: RiskWeights,
}

impl Config {
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            text: self.text.clone(),
            weights: self.scoring.weights.clone(),
            categories: self.categories.clone(),
            thresholds: self.thresholds.clone(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_dir>/.label-checkr/config.toml`
/// 3. `~/.config/label-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local = base_dir.join(".label-checkr").join("config.toml");
    if local.exists() {
        return read_config(&local);
    }

    if let Some(home) = home_config_path() {
        if home.exists() {
            return read_config(&home);
        }
    }

    Ok(Config::default())
}

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("label-checkr").join("config.toml"))
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(cfg.knowledge_base.sources.is_empty());
        assert_eq!(cfg.scoring.weights, RiskWeights::default());
        assert_eq!(cfg.categories, CategoryTable::default());
        assert_eq!(cfg.thresholds, Thresholds::default());
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[scoring.weights]
unrecognized = 6

[thresholds]
animal_alert_at_or_below = 60

[categories]
fallback = "otro"
"#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.weights.unrecognized, 6);
        assert_eq!(cfg.scoring.weights.dangerous, 10);
        assert_eq!(cfg.thresholds.animal_alert_at_or_below, 60);
        assert_eq!(cfg.thresholds.human_danger_below, 60);
        assert_eq!(cfg.categories.fallback, "otro");
        assert_eq!(cfg.categories.rules.len(), 5);
    }

    #[test]
    fn test_custom_category_rules_replace_table() {
        let cfg: Config = toml::from_str(
            r#"
[[categories.rules]]
name = "mascotas"
keywords = ["croquetas"]
"#,
        )
        .unwrap();
        let analysis = cfg.analysis();
        assert_eq!(analysis.categories.rules.len(), 1);
        assert_eq!(analysis.categories.fallback, "other");
    }

    #[test]
    fn test_override_path_wins() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[knowledge_base]\nsources = [\"kb.json\"]\n").unwrap();
        let dir = TempDir::new().unwrap();
        let cfg = load_config(dir.path(), Some(f.path())).unwrap();
        assert_eq!(cfg.knowledge_base.sources, vec!["kb.json"]);
    }

    #[test]
    fn test_local_config_found_in_base_dir() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".label-checkr");
        std::fs::create_dir(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[text]\nsection_patterns = [\"ingredientes?\"]\n",
        )
        .unwrap();
        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.text.section_patterns, vec!["ingredientes?"]);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[thresholds]\nhuman_danger_below = \"low\"\n").unwrap();
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(f.path())).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }
}
