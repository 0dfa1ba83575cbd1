//! Runtime settings: TOML file, then `WHISPERER_*` environment variables, then
//! command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use whisperer_core::relation::{AD_SALES, ELIGIBILITY, TOTAL_SALES};
use whisperer_llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, ModelConfig};
use whisperer_store_sqlite::TableSource;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub database_path:   PathBuf,
  pub ad_sales_csv:    PathBuf,
  pub total_sales_csv: PathBuf,
  pub eligibility_csv: PathBuf,
  pub model_url:       String,
  pub model_name:      String,
  pub export_dir:      PathBuf,
  pub log_file:        PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      database_path:   "ecommerce.db".into(),
      ad_sales_csv:    "DATASET/Product-Level Ad Sales and Metrics (mapped).csv".into(),
      total_sales_csv: "DATASET/Product-Level Total Sales and Metrics (mapped).csv".into(),
      eligibility_csv: "DATASET/Product-Level Eligibility Table (mapped).csv".into(),
      model_url:       DEFAULT_BASE_URL.into(),
      model_name:      DEFAULT_MODEL.into(),
      export_dir:      ".".into(),
      log_file:        "whisperer.log".into(),
    }
  }
}

impl Settings {
  /// Read `file` (optional) and the environment on top of the defaults.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("WHISPERER"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn database_path(&self) -> PathBuf { expand_tilde(&self.database_path) }

  pub fn export_dir(&self) -> PathBuf { expand_tilde(&self.export_dir) }

  pub fn log_file(&self) -> PathBuf { expand_tilde(&self.log_file) }

  /// The three source files, in load order.
  pub fn sources(&self) -> Vec<TableSource> {
    [
      (AD_SALES.name, &self.ad_sales_csv),
      (TOTAL_SALES.name, &self.total_sales_csv),
      (ELIGIBILITY.name, &self.eligibility_csv),
    ]
    .into_iter()
    .map(|(table, path)| TableSource::new(table, expand_tilde(path)))
    .collect()
  }

  pub fn model_config(&self) -> ModelConfig {
    ModelConfig {
      base_url: self.model_url.clone(),
      model:    self.model_name.clone(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(s.model_url, "http://localhost:11434");
    assert_eq!(s.database_path, PathBuf::from("ecommerce.db"));
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whisperer.toml");
    fs::write(&path, "model_name = \"llama3\"\nexport_dir = \"out\"\n").unwrap();

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.model_name, "llama3");
    assert_eq!(s.export_dir, PathBuf::from("out"));
    assert_eq!(s.model_url, "http://localhost:11434");
  }

  #[test]
  fn sources_are_in_load_order() {
    let tables: Vec<_> = Settings::default()
      .sources()
      .into_iter()
      .map(|s| s.table)
      .collect();
    assert_eq!(tables, ["ad_sales", "total_sales", "eligibility"]);
  }
}
