//! TOML configuration for the `verdant` binary.
//!
//! Every field has a compiled-in default, so the binary runs with no
//! config file at all.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use verdant_core::config::{AbbreviationTable, ScoringConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Path of the SQLite database file.
  pub store_path:  PathBuf,
  /// Address the `serve` subcommand binds to.
  pub listen_addr: String,
  pub scoring:     ScoringConfig,
  /// Extra abbreviation entries merged over the built-in table,
  /// overriding on collision.
  pub abbreviations: AbbreviationTable,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:    PathBuf::from("verdant.db"),
      listen_addr:   "127.0.0.1:8080".to_owned(),
      scoring:       ScoringConfig::default(),
      abbreviations: AbbreviationTable::new(Default::default()),
    }
  }
}

impl AppConfig {
  /// Load from `path` if it exists, otherwise fall back to defaults.
  /// The sector weight table is validated either way.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let config = if path.exists() {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
      toml::from_str(&raw).context("parsing config file")?
    } else {
      tracing::debug!(path = %path.display(), "no config file, using defaults");
      Self::default()
    };

    config.scoring.validate().context("invalid sector weights")?;
    Ok(config)
  }

  /// The built-in abbreviation table extended with configured entries.
  pub fn abbreviation_table(&self) -> AbbreviationTable {
    let mut table = AbbreviationTable::default();
    table.extend(self.abbreviations.clone());
    table
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_config_parses_to_defaults() {
    let config: AppConfig = toml::from_str("").unwrap();
    assert_eq!(config.store_path, PathBuf::from("verdant.db"));
    assert_eq!(config.listen_addr, "127.0.0.1:8080");
    assert_eq!(config.scoring.lookback_days, 365);
  }

  #[test]
  fn partial_config_keeps_remaining_defaults() {
    let config: AppConfig = toml::from_str(
      r#"
        store_path = "/var/lib/verdant/esg.db"

        [scoring]
        lookback_days = 90

        [abbreviations]
        "Acme Industrial Holdings" = ["Acme"]
      "#,
    )
    .unwrap();
    assert_eq!(config.store_path, PathBuf::from("/var/lib/verdant/esg.db"));
    assert_eq!(config.scoring.lookback_days, 90);

    let table = config.abbreviation_table();
    let hits: Vec<&str> =
      table.expansions_for("Acme Industrial Holdings Ltd").collect();
    assert_eq!(hits, vec!["Acme"]);
    // Built-in entries survive the merge.
    assert!(table.expansions_for("Infosys Limited").count() > 0);
  }
}
